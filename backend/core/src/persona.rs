//! Narration personas and their style descriptors.
//!
//! Each persona is a row in [`STYLES`]: prompt preamble, synthesized voice,
//! language tag, prosody and an optional catchphrase. Resolving a persona
//! from caller input never fails; unknown names fall back to the narrator.

use serde::{Deserialize, Serialize};

/// Prosody adjustments applied to the synthesized voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prosody {
    pub rate: &'static str,
    pub pitch: &'static str,
    pub volume: &'static str,
}

/// Everything that differs between personas.
#[derive(Debug)]
pub struct PersonaStyle {
    pub name: &'static str,
    /// Accepted spellings, matched case-insensitively.
    pub aliases: &'static [&'static str],
    pub preamble: &'static str,
    pub voice: &'static str,
    pub language: &'static str,
    pub gender: &'static str,
    pub prosody: Prosody,
    pub catchphrase: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Calm nature-documentary narrator.
    #[default]
    Narrator,
    /// Enthusiastic, exclamatory wildlife host.
    Host,
}

static STYLES: [PersonaStyle; 2] = [
    PersonaStyle {
        name: "narrator",
        aliases: &["narrator", "attenborough", "documentary"],
        preamble: "You are narrating a continuous wildlife documentary in the style of Sir David Attenborough: \
                   calm, reverent, quietly fascinated by ordinary behaviour.",
        voice: "en-GB-RyanNeural",
        language: "en-GB",
        gender: "Male",
        prosody: Prosody {
            rate: "-5%",
            pitch: "-2%",
            volume: "+0%",
        },
        catchphrase: None,
    },
    PersonaStyle {
        name: "host",
        aliases: &["host", "irwin", "crikey"],
        preamble: "You are an enthusiastic Australian wildlife host in the style of Steve Irwin: \
                   energetic, exclamatory, thrilled by everything you see, speaking as if crouched right beside it.",
        voice: "en-AU-WilliamNeural",
        language: "en-AU",
        gender: "Male",
        prosody: Prosody {
            rate: "+12%",
            pitch: "+6%",
            volume: "+10%",
        },
        catchphrase: Some("Crikey!"),
    },
];

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Narrator, Persona::Host];

    /// Resolve caller input; absent or unrecognised values give the narrator.
    pub fn resolve(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return Self::default();
        };
        Self::ALL
            .into_iter()
            .find(|p| p.style().aliases.iter().any(|a| a.eq_ignore_ascii_case(value)))
            .unwrap_or_default()
    }

    pub fn style(&self) -> &'static PersonaStyle {
        match self {
            Self::Narrator => &STYLES[0],
            Self::Host => &STYLES[1],
        }
    }

    /// Persona-specific rewrite of the model's narration.
    pub fn post_process(&self, text: &str) -> String {
        match self.style().catchphrase {
            Some(phrase) => apply_catchphrase(text, phrase),
            None => text.to_string(),
        }
    }
}

/// Prefix `catchphrase` to every sentence that does not already start with it.
///
/// Sentences end at `.`, `?` or `!` followed by whitespace. A sentence that
/// is nothing but the catchphrase is attached to the sentence after it, so
/// the pass is idempotent.
pub fn apply_catchphrase(text: &str, catchphrase: &str) -> String {
    let word = catchphrase.trim_end_matches(|c: char| c.is_ascii_punctuation());
    let mut out: Vec<String> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for sentence in split_sentences(text) {
        if is_only(sentence, word) {
            pending.push(sentence);
            continue;
        }
        let sentence = if pending.is_empty() {
            sentence.to_string()
        } else {
            let joined = format!("{} {}", pending.join(" "), sentence);
            pending.clear();
            joined
        };
        if starts_with_word(&sentence, word) {
            out.push(sentence);
        } else {
            out.push(format!("{catchphrase} {sentence}"));
        }
    }
    out.extend(pending.into_iter().map(str::to_string));
    out.join(" ")
}

fn starts_with_word(sentence: &str, word: &str) -> bool {
    sentence
        .get(..word.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(word))
}

fn is_only(sentence: &str, word: &str) -> bool {
    sentence
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .eq_ignore_ascii_case(word)
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else { break };
        if !next.is_whitespace() {
            continue;
        }
        sentences.push(&text[start..i + c.len_utf8()]);
        start = text.len();
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                start = j;
                break;
            }
            chars.next();
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
