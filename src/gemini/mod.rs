//! Client for the Google Gemini `generateContent` API
mod core;
pub use self::core::*;
