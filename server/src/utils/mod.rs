//! Utility functions

pub mod file;
