//! PTT board listing and article fetching.

pub mod client;
pub mod error;
pub mod parse;
mod retry;
pub mod types;

pub use client::{select_targets, PttClient};
pub use error::PttError;
pub use types::{Article, BoardRow};
