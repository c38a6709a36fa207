//! Tool orchestration module
//!
//! Ties decoding, background jobs and export together into the per-tool session
//! the image tools run on, plus the static tool registry and error notices.

pub mod catalog;
mod notice;
mod session;
pub mod types;

#[cfg(test)]
mod tests;

pub use catalog::{ToolCategory, ToolDescriptor, all_tools, find_tool, tools_in};
pub use notice::{Notice, NoticeLevel};
pub use session::ToolSession;
pub use types::{SessionConfig, SessionConfigBuilder, ToolOutput};
