//! API Lambda handler and request processing

pub mod callback;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod state;
pub mod task;

// Re-export the main handler for convenience
pub use handler::handler;
pub use state::ApiState;
