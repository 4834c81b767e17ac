//! Sentim - video comment sentiment dashboard
//!
//! Extracts a video identifier from a pasted link, pages through every
//! top-level comment, has an external service classify them, tallies the
//! labels, and collects three chart images rendered by the same service.

pub mod analysis;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod session;
pub mod video_id;
pub mod youtube;

pub use error::{ErrorKind, Result, SentimError};
