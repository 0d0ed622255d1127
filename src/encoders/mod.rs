//! Entry encoders

pub mod console;
pub mod gelf;

pub use console::{ConsoleConfig, ConsoleEncoder};
pub use gelf::GelfEncoder;

use crate::core::{Entry, Result};

/// Turns one entry into the bytes a sink receives.
///
/// Encoders keep no per-call state; the same encoder may be used from many
/// threads at once. `buf` arrives empty and receives exactly one payload.
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &Entry, buf: &mut Vec<u8>) -> Result<()>;

    /// Independent copy of this encoder and its configuration.
    fn clone_encoder(&self) -> Box<dyn Encoder>;
}
