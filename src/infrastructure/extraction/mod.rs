pub mod gemini_extractor;
pub mod unconfigured_extractor;

pub use gemini_extractor::{GeminiConfig, GeminiExtractor};
pub use unconfigured_extractor::UnconfiguredExtractor;
