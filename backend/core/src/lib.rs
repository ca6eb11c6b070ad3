pub mod error;
pub mod image;
pub mod persona;
pub mod traits;
pub mod types;

pub use error::{NarratorError, UpstreamService};
pub use image::ImagePayload;
pub use persona::{apply_catchphrase, Persona, PersonaStyle, Prosody};
pub use traits::{VisionModel, VisionRequest};
pub use types::{FoodAnalysis, NarrationRequest, NarrationResult, RecipeDetail, Suggestion};
