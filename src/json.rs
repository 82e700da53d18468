//! Extracting JSON documents from model output.
//!
//! JSON mode asks the model for a single JSON document, but output can still
//! arrive wrapped in a Markdown fence, with trailing commas, or cut off by
//! the output token cap. [`parse_json_output`] recovers what it can and says
//! how it got there.

use serde_json::Value;
use std::fmt;

/// Characters of the failing text kept from the start in a [`JsonExtractError`].
const HEAD_PREVIEW_CHARS: usize = 500;
/// Characters of the failing text kept from the end in a [`JsonExtractError`].
const TAIL_PREVIEW_CHARS: usize = 200;

/// A JSON document recovered from model output.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonOutput {
    /// The parsed document
    pub value: Value,
    /// True if trailing commas or an unterminated tail had to be fixed
    pub repaired: bool,
    /// True if the document was cut back to its last complete member;
    /// fields after that point are missing
    pub partial: bool,
}

/// Model output that could not be turned into JSON by any strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonExtractError {
    /// Length of the text that was parsed, in characters
    pub length: usize,
    /// The first characters of the text
    pub head: String,
    /// The last characters of the text
    pub tail: String,
}

impl fmt::Display for JsonExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse JSON output after 3 attempts; length: {} chars; content may be truncated or malformed",
            self.length
        )
    }
}

impl std::error::Error for JsonExtractError {}

/// Parses model output as one JSON document.
///
/// Tries, in order: a strict parse after stripping any Markdown code fence;
/// a repair pass that drops trailing commas and closes an unterminated tail;
/// and a partial parse that cuts back to the last `"}` and closes what is
/// still open.
///
/// # Errors
///
/// Returns [`JsonExtractError`] with previews of the text when every
/// strategy fails.
///
/// # Example
///
/// ```rust
/// use liquidbooks_ai::json::parse_json_output;
///
/// let output = parse_json_output("```json\n{\"title\": \"Intro\",}\n```").unwrap();
/// assert_eq!(output.value["title"], "Intro");
/// assert!(output.repaired);
/// ```
pub fn parse_json_output(text: &str) -> Result<JsonOutput, JsonExtractError> {
    let content = strip_code_fence(text.trim());

    if let Ok(value) = serde_json::from_str(content) {
        return Ok(JsonOutput {
            value,
            repaired: false,
            partial: false,
        });
    }

    let repaired = repair(content);
    match serde_json::from_str(&repaired) {
        Ok(value) => {
            tracing::debug!(length = content.len(), "JSON output repaired");
            return Ok(JsonOutput {
                value,
                repaired: true,
                partial: false,
            });
        }
        Err(e) => tracing::debug!(error = %e, "JSON repair failed"),
    }

    if let Some(truncated) = truncate_to_last_member(content) {
        if let Ok(value) = serde_json::from_str(&truncated) {
            tracing::warn!(length = content.len(), "JSON output was incomplete; kept a partial document");
            return Ok(JsonOutput {
                value,
                repaired: true,
                partial: true,
            });
        }
    }

    Err(JsonExtractError {
        length: content.chars().count(),
        head: content.chars().take(HEAD_PREVIEW_CHARS).collect(),
        tail: tail_chars(content, TAIL_PREVIEW_CHARS),
    })
}

/// Returns the body of a leading ```` ```json ```` or ```` ``` ```` fence.
fn strip_code_fence(text: &str) -> &str {
    let body = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };

    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn truncate_to_last_member(content: &str) -> Option<String> {
    let end = content.rfind("\"}")?;
    if end == 0 {
        return None;
    }

    Some(repair(&content[..end + 2]))
}

/// Drops commas that directly precede a closer, terminates an open string,
/// then appends closers for every `{` and `[` left open. Only characters
/// outside string literals are touched.
fn repair(content: &str) -> String {
    let mut fixed = String::with_capacity(content.len() + 8);
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            fixed.push(c);
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                open.pop();
            }
            ',' if is_trailing_comma(&content[i + c.len_utf8()..]) => continue,
            _ => {}
        }
        fixed.push(c);
    }

    if in_string {
        fixed.push('"');
    }
    while let Some(closer) = open.pop() {
        fixed.push('\n');
        fixed.push(closer);
    }
    fixed
}

/// A comma is trailing when only whitespace separates it from a closer or
/// from the end of the text, where closers will be appended.
fn is_trailing_comma(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), None | Some('}' | ']'))
}

fn tail_chars(text: &str, n: usize) -> String {
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(n)).collect()
}
