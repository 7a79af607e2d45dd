//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles file operations and other external dependencies.

pub mod dictionary_io;
pub mod hints_io;
pub mod puzzle_io;
