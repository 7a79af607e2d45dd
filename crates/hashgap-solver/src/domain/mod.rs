//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod candidate;
pub mod corpus;
pub mod digest;
pub mod keyspace;
pub mod lookup;
pub mod report;
pub mod target;
pub mod variants;
