//! chatshelf - a chat widget with saved conversations.
//!
//! Conversations live in a single storage slot, one exchange at a time is
//! sent to a chat endpoint, and threads render either as HTML or in the
//! terminal.

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod widget;

pub use config::Config;
pub use error::{Error, Result};
pub use widget::ChatWidget;
