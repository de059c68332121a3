//! User management filter compiler and query service

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod filter;
pub mod utils;
