//! Handler implementations

pub mod console;
pub mod gelf;

pub use console::ConsoleHandler;
pub use gelf::GelfHandler;
