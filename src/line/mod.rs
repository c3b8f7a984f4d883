//! All LINE-specific functionality

pub mod client;
pub mod events;
pub mod messages;

// Re-export main types for convenience
pub use client::LineClient;
pub use events::{Event, EventMessage, EventType, WebhookBody};
pub use messages::SendMessage;
