//! Recipe reply parsing.

use narrator_core::RecipeDetail;
use serde_json::{json, Value};

use crate::extract::{parse_lenient, Lenient};

/// Parse the model's recipe for `title`, falling back to a generic one.
///
/// Any JSON object is accepted as-is. Only a missing, null or blank title is
/// filled in with the requested one.
pub fn parse_recipe(raw: &str, title: &str) -> Lenient<RecipeDetail> {
    let mut parsed = parse_lenient(raw, |_| fallback_recipe(title));
    if parsed.value.title_is_blank() {
        parsed.value.set_title(title);
    }
    parsed
}

/// A placeholder recipe that echoes the requested title exactly.
pub fn fallback_recipe(title: &str) -> RecipeDetail {
    let recipe = json!({
        "title": title,
        "ingredients": [
            "Your main ingredients for this dish",
            "Salt and pepper to taste",
            "A drizzle of olive oil"
        ],
        "instructions": [
            "Prepare and chop the ingredients.",
            "Cook over medium heat until done, stirring occasionally.",
            "Season to taste and serve warm."
        ],
        "prepTime": "10 minutes",
        "cookTime": "20 minutes",
        "tips": "We couldn't load the full recipe just now; try again for detailed steps."
    });
    match recipe {
        Value::Object(map) => map.into(),
        _ => RecipeDetail::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_reply_echoes_title() {
        let out = parse_recipe("Sorry, I can't help with that.", "Tomato Soup");
        assert!(out.fallback);
        assert_eq!(out.value.title(), "Tomato Soup");
        assert!(out.value.get("ingredients").is_some_and(Value::is_array));
        assert!(out.value.get("instructions").is_some_and(Value::is_array));
        assert_eq!(out.value.get("prepTime"), Some(&json!("10 minutes")));
    }

    #[test]
    fn parses_recipe_in_prose() {
        let raw = r#"Of course! {"title":"Tomato Soup","ingredients":["6 tomatoes"],"instructions":["Roast","Blend"],"prepTime":"10 min","cookTime":"30 min","tips":"Add basil."}"#;
        let out = parse_recipe(raw, "Tomato Soup");
        assert!(!out.fallback);
        assert_eq!(out.value.get("instructions"), Some(&json!(["Roast", "Blend"])));
        assert_eq!(out.value.get("tips"), Some(&json!("Add basil.")));
    }

    #[test]
    fn untitled_reply_gets_requested_title() {
        let out = parse_recipe(r#"{"ingredients":["rice"]}"#, "Fried Rice");
        assert!(!out.fallback);
        assert_eq!(out.value.title(), "Fried Rice");

        let out = parse_recipe(r#"{"title":"   ","ingredients":["rice"]}"#, "Fried Rice");
        assert_eq!(out.value.title(), "Fried Rice");
    }

    #[test]
    fn model_title_is_kept() {
        let out = parse_recipe(r#"{"title":"Egg Fried Rice"}"#, "Fried Rice");
        assert_eq!(out.value.title(), "Egg Fried Rice");
    }

    #[test]
    fn unusual_field_types_survive() {
        let raw = r#"{"title":"Fried Rice","ingredients":"rice, egg","prepTime":10,"cookTime":{"minutes":15},"servings":2}"#;
        let out = parse_recipe(raw, "Fried Rice");
        assert!(!out.fallback);
        assert_eq!(
            serde_json::to_value(&out.value).unwrap(),
            serde_json::from_str::<Value>(raw).unwrap()
        );
    }

    #[test]
    fn non_object_reply_falls_back() {
        let out = parse_recipe(r#"["rice", "egg"]"#, "Fried Rice");
        assert!(out.fallback);
        assert_eq!(out.value.title(), "Fried Rice");
    }
}
