//! Reply normalization for the tailoring webhook.
//!
//! The workflow service has answered in several shapes over time. Each
//! accepted shape is tried in a fixed order and the first match wins:
//!
//! 1. `Direct`: `{ "tailoredResume": "...", "tailoredResumeUrl": "..." }`
//! 2. `ListItem`: `[ { "content": "..." } ]` (exactly one element, any
//!    accepted text key)
//! 3. `AlternateKey`: `{ "content" | "output" | "text" | ...: "..." }`
//!
//! Anything else is `FormatDrift`. Whether drift becomes placeholder text or
//! a failure is the caller's decision.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PRIMARY_TEXT_KEY: &str = "tailoredResume";

/// Fallback text keys, in priority order.
const ALTERNATE_TEXT_KEYS: [&str; 5] = ["content", "output", "text", "tailored_resume", "result"];

const URL_KEYS: [&str; 2] = ["tailoredResumeUrl", "tailored_resume_url"];

/// Text stored when the reply matched no known shape and placeholder
/// fallback is enabled.
pub const PLACEHOLDER_TEXT: &str = "Tailored resume content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyShape {
    Direct,
    ListItem,
    AlternateKey,
    Placeholder,
}

impl ReplyShape {
    pub fn as_str(self) -> &'static str {
        match self {
            ReplyShape::Direct => "direct",
            ReplyShape::ListItem => "list_item",
            ReplyShape::AlternateKey => "alternate_key",
            ReplyShape::Placeholder => "placeholder",
        }
    }
}

/// Tailored text extracted from a webhook reply, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailoredOutput {
    pub shape: ReplyShape,
    pub text: String,
    pub url: Option<String>,
}

impl TailoredOutput {
    pub fn placeholder() -> Self {
        Self {
            shape: ReplyShape::Placeholder,
            text: PLACEHOLDER_TEXT.to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedReply {
    Matched(TailoredOutput),
    FormatDrift,
}

impl NormalizedReply {
    pub fn parse(reply: &Value) -> Self {
        let matched = match reply {
            Value::Object(obj) => direct(obj).or_else(|| alternate(obj)),
            Value::Array(items) if items.len() == 1 => match &items[0] {
                Value::Object(obj) => direct(obj)
                    .or_else(|| alternate(obj))
                    .map(|out| TailoredOutput {
                        shape: ReplyShape::ListItem,
                        ..out
                    }),
                _ => None,
            },
            _ => None,
        };

        match matched {
            Some(out) => NormalizedReply::Matched(out),
            None => NormalizedReply::FormatDrift,
        }
    }
}

fn direct(obj: &Map<String, Value>) -> Option<TailoredOutput> {
    let text = non_empty_str(obj, PRIMARY_TEXT_KEY)?;
    Some(TailoredOutput {
        shape: ReplyShape::Direct,
        text,
        url: url_of(obj),
    })
}

fn alternate(obj: &Map<String, Value>) -> Option<TailoredOutput> {
    ALTERNATE_TEXT_KEYS
        .iter()
        .find_map(|key| non_empty_str(obj, key))
        .map(|text| TailoredOutput {
            shape: ReplyShape::AlternateKey,
            text,
            url: url_of(obj),
        })
}

fn url_of(obj: &Map<String, Value>) -> Option<String> {
    URL_KEYS.iter().find_map(|key| non_empty_str(obj, key))
}

fn non_empty_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
