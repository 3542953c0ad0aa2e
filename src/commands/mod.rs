//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod timeline;
pub mod views;

// Re-export main command functions
pub use timeline::{execute_timeline, validate_args, TimelineArgs};
pub use views::{execute_views, ViewsArgs};
