//! Provider implementations for different image-generation services.

pub mod banana;
pub mod gemini;

// Re-export commonly used provider types
pub use banana::BananaProvider;
pub use gemini::GeminiProvider;
