//! I/O utilities for file handling
//!
//! This module provides the big-endian sample codec and input opening.

pub mod sample;
pub mod source;

pub use sample::Sample;
pub use source::open_input;
