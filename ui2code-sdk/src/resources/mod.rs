//! SDK resource modules

pub mod chat;

pub use chat::ChatClient;
