//! Food-analysis reply parsing.

use narrator_core::{FoodAnalysis, Suggestion};

use crate::extract::{parse_lenient, Lenient};

/// Longest commentary carried over from an unparsable reply, in characters.
pub const FALLBACK_COMMENTARY_CHARS: usize = 200;

const EMPTY_REPLY_COMMENTARY: &str = "I couldn't quite make out what's on the counter.";

/// Parse the model's reply, falling back to a generic analysis.
pub fn parse_food_analysis(raw: &str) -> Lenient<FoodAnalysis> {
    parse_lenient(raw, fallback_food_analysis)
}

/// The reply text, truncated, plus one generic suggestion.
pub fn fallback_food_analysis(raw: &str) -> FoodAnalysis {
    let trimmed = raw.trim();
    let commentary = if trimmed.is_empty() {
        EMPTY_REPLY_COMMENTARY.to_string()
    } else {
        trimmed.chars().take(FALLBACK_COMMENTARY_CHARS).collect()
    };

    FoodAnalysis {
        commentary,
        suggestions: vec![Suggestion {
            title: "Chef's Choice Stir-Fry".to_string(),
            description: "Toss whatever fresh ingredients you have in a hot pan with oil, garlic and a splash of soy sauce."
                .to_string(),
        }],
    }
}
