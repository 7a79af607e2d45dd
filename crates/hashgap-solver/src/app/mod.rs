//! Application layer - Use case implementations
//!
//! This module coordinates domain and infrastructure layers to implement use cases.

pub mod config;
pub mod gap_closer;
pub mod key_search;
pub mod pipeline;
pub mod reconstruct;
