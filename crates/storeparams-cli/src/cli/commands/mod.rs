//! CLI command handlers, one per file.

mod capture;
mod completions;
mod dump;
mod new_session;
mod read;

pub use capture::run_capture;
pub use completions::run_completions;
pub use dump::run_dump;
pub use new_session::run_new_session;
pub use read::run_read;
