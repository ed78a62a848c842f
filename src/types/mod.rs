//! Core types used throughout the gateway.

pub mod config;
pub mod image;
pub mod request;

// Re-export commonly used types
pub use config::*;
pub use image::*;
pub use request::*;
