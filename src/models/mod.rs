pub mod blueprint;
pub mod chat;
