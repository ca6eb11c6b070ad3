//! The request handler behind every HTTP route.
//!
//! Each operation is a single pass: check configuration, validate input,
//! call the vision model, then either synthesize speech or parse the reply.

pub mod handler;

pub use handler::{RequestHandler, NARRATION_CONFIG_MESSAGE, VISION_CONFIG_MESSAGE};
