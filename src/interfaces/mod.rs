//! Presentation adapters: the operator console and receipt rendering.

pub mod console;
pub mod csv;
pub mod receipt;
