//! Speech-markup (SSML) documents.

use crate::engine::TtsRequest;

/// Escape text for embedding in an XML element or single-quoted attribute.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Build the `<speak>` document for a request.
pub fn build_ssml(req: &TtsRequest) -> String {
    let lang = escape_text(&req.language);
    let body = escape_text(req.text.trim());
    let body = match &req.prosody {
        Some(p) => format!(
            "<prosody rate='{}' pitch='{}' volume='{}'>{}</prosody>",
            escape_text(p.rate),
            escape_text(p.pitch),
            escape_text(p.volume),
            body
        ),
        None => body,
    };

    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{lang}'>\
         <voice xml:lang='{lang}' xml:gender='{gender}' name='{name}'>{body}</voice>\
         </speak>",
        gender = escape_text(&req.gender),
        name = escape_text(&req.voice),
    )
}
