//! Task processing: decode a deferred event and reply to it

pub mod handler;
pub mod process;
pub mod reply;

// Re-export the main entry points for convenience
pub use handler::function_handler as handler;
pub use process::{TaskOutcome, TaskStage, process_task};
pub use reply::{UNSUPPORTED_MESSAGE_REPLY, build_reply};
