pub mod extract;
pub mod food;
pub mod prompts;
pub mod recipe;
pub mod vision;

pub use extract::{extract_json_object, parse_lenient, Lenient};
pub use food::{fallback_food_analysis, parse_food_analysis};
pub use prompts::{food_prompt, narration_prompt, recipe_prompt};
pub use recipe::{fallback_recipe, parse_recipe};
pub use vision::GeminiVision;
