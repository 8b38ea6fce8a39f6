// crates/place-engines/src/lib.rs
pub mod gemini;

pub use gemini::GeminiExtractor;
