pub mod client;
pub mod types;

pub use client::{ApiError, ChatBackend, HttpChatBackend};
pub use types::{DeliveryStatus, Message};
