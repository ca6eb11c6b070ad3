use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of a narration request, as sent by the camera page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NarrationRequest {
    /// `data:image/jpeg;base64,...`
    pub image: Option<String>,
    /// Narration produced so far, passed back verbatim by the client.
    #[serde(default)]
    pub history: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
}

/// Narration text with its synthesized audio. Both or neither.
#[derive(Debug, Clone)]
pub struct NarrationResult {
    pub text: String,
    pub audio: Bytes,
    pub mime_type: &'static str,
}

/// A single dish idea from the food analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Missing and `null` fields both become empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub commentary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<Suggestion>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Full recipe for one suggestion, kept as the JSON object the model wrote.
///
/// Usual keys are `title`, `ingredients`, `instructions`, `prepTime`,
/// `cookTime` and `tips`, but none of them is required or typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeDetail(Map<String, Value>);

impl RecipeDetail {
    /// The `title` when it is a string, else `""`.
    pub fn title(&self) -> &str {
        self.0.get("title").and_then(Value::as_str).unwrap_or_default()
    }

    /// True when `title` is absent, null, or a blank string.
    pub fn title_is_blank(&self) -> bool {
        match self.0.get("title") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.0.insert("title".to_string(), Value::String(title.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for RecipeDetail {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
