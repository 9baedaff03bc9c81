pub mod chat;
pub mod fixture;
pub mod intent;
