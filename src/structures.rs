use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::NoticeError;

pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

// A present-but-null field decodes like a missing one.
fn category_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default_category))
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Backend-assigned identifier. Some backends hand out integers, others strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum NoticeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeId::Number(n) => write!(f, "{}", n),
            NoticeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NoticeId {
    fn from(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => NoticeId::Number(n),
            Err(_) => NoticeId::Text(raw.trim().to_owned()),
        }
    }
}

impl From<i64> for NoticeId {
    fn from(n: i64) -> Self {
        NoticeId::Number(n)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub title: String,
    pub content: String,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub date: String,
}

/// Payload of a create request. Only constructible through [`NewNotice::new`],
/// so a draft that reaches the wire always has a non-empty title and content.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    title: String,
    content: String,
    category: String,
}

pub const MISSING_FIELDS: &str = "Please provide title and content";

impl NewNotice {
    pub fn new(title: &str, content: &str, category: &str) -> Result<Self, NoticeError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(NoticeError::Validation(MISSING_FIELDS.to_owned()));
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        Ok(NewNotice {
            title: title.to_owned(),
            content: content.to_owned(),
            category: category.to_owned(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Listing response. The bare array is canonical; the envelope is what the
/// older `/notices` route returns.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum NoticeListing {
    Bare(Vec<Notice>),
    Envelope { notices: Vec<Notice> },
}

impl NoticeListing {
    pub fn into_notices(self) -> Vec<Notice> {
        match self {
            NoticeListing::Bare(notices) => notices,
            NoticeListing::Envelope { notices } => notices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateReply {
    pub message: Option<String>,
    pub notice: Option<Notice>,
}

impl CreateReply {
    /// Accepts `{message}`, `{message, notice}` or the created notice itself.
    pub fn from_value(value: &Value) -> Self {
        let message = message_of(value);
        let notice = value
            .get("notice")
            .or_else(|| value.get("id").map(|_| value))
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        CreateReply { message, notice }
    }
}

pub fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

pub fn error_of(value: &Value) -> Option<String> {
    value.get("error").and_then(Value::as_str).map(str::to_owned)
}
