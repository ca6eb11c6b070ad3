pub mod azure;
pub mod engine;
pub mod ssml;

pub use azure::AzureSpeech;
pub use engine::{AudioFormat, TtsProvider, TtsRequest};
pub use ssml::{build_ssml, escape_text};
