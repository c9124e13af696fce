// Domain module - Shared types
pub mod config;
pub mod error;
pub mod status;
