//! Core domain models for the harness
//!
//! This module defines trials, their outcomes, the run summary and the
//! rules deciding which trials run.

pub mod condition;
pub mod conclusion;
pub mod config;
pub mod filter;
pub mod trial;

pub use conclusion::*;
pub use trial::*;
