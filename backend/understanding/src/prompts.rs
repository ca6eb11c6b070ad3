//! Prompt builders for the three request kinds.

use narrator_core::Persona;

/// Continue an ongoing narration in the persona's voice.
///
/// `history` is embedded verbatim.
pub fn narration_prompt(persona: Persona, history: &str) -> String {
    format!(
        "{preamble} \
         Build upon the previous narration without repeating earlier lines. \
         If nothing substantially new is visible, say something brief acknowledging continuity. \
         Reply with 1-2 concise sentences.\n\n\
         Previous narration so far:\n{history}\n\n\
         Now continue with the next line based on the current image.",
        preamble = persona.style().preamble,
    )
}

/// Identify food in the frame and suggest dishes, as a JSON object.
pub fn food_prompt() -> String {
    concat!(
        "You are a friendly chef looking at a photo of a kitchen counter or fridge. ",
        "Identify the food items and ingredients that are visible. ",
        "Respond ONLY with a JSON object of this exact shape:\n",
        "{\"commentary\": \"one or two upbeat sentences about what you see\", ",
        "\"suggestions\": [{\"title\": \"dish name\", \"description\": \"one sentence on how the visible ingredients are used\"}]}\n",
        "Give up to three suggestions. ",
        "If the ingredients look the same as a typical previous frame, keep the same suggestions in the same order. ",
        "If no food is visible, say so in the commentary and return an empty suggestions array. ",
        "Do not wrap the JSON in code fences or add any other text."
    )
    .to_string()
}

/// Expand one suggestion into a full recipe, as a JSON object.
pub fn recipe_prompt(title: &str, description: Option<&str>) -> String {
    let context = match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => format!("The dish was described as: {d}\n"),
        None => String::new(),
    };
    format!(
        "Write a home-cooking recipe for \"{title}\".\n\
         {context}\
         Respond ONLY with a JSON object of this exact shape:\n\
         {{\"title\": \"{title}\", \"ingredients\": [\"quantity and ingredient\"], \
         \"instructions\": [\"one step per entry\"], \"prepTime\": \"e.g. 10 minutes\", \
         \"cookTime\": \"e.g. 20 minutes\", \"tips\": \"one short serving or storage tip\"}}\n\
         Do not wrap the JSON in code fences or add any other text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_prompt_embeds_history_verbatim() {
        let history = "The heron waits.\nIt strikes!";
        let prompt = narration_prompt(Persona::Narrator, history);
        assert!(prompt.contains(history));
        assert!(prompt.contains("Attenborough"));
        assert!(prompt.contains("1-2 concise sentences"));
    }

    #[test]
    fn narration_prompt_follows_persona() {
        let prompt = narration_prompt(Persona::Host, "");
        assert!(prompt.starts_with(Persona::Host.style().preamble));
    }

    #[test]
    fn recipe_prompt_includes_description_when_given() {
        let with = recipe_prompt("Tomato Soup", Some("Blend roasted tomatoes."));
        assert!(with.contains("Blend roasted tomatoes."));
        let without = recipe_prompt("Tomato Soup", Some("  "));
        assert!(!without.contains("described as"));
        assert!(without.contains("\"title\": \"Tomato Soup\""));
    }

    #[test]
    fn food_prompt_asks_for_json() {
        let prompt = food_prompt();
        assert!(prompt.contains("\"suggestions\""));
        assert!(prompt.contains("empty suggestions array"));
    }
}
