use crate::config::{IdeasConfig, LanguageConfig};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// IdeaStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    /// Fixed initial status of every accepted idea.
    #[default]
    Pending,
    Built,
    Published,
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdeaStatus::Pending => "pending",
            IdeaStatus::Built => "built",
            IdeaStatus::Published => "published",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// IdeaDraft
// ---------------------------------------------------------------------------

/// A normalized idea that has not been accepted into history yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaDraft {
    pub name: String,
    pub name_localized: String,
    pub summary: String,
    pub problem: String,
    pub opportunity: String,
    pub target_users: String,
    pub ai_capabilities: Vec<String>,
    pub key_features: Vec<String>,
    pub technical_approach: String,
}

impl IdeaDraft {
    /// Stamp the draft with its acceptance metadata.
    pub fn accept(self, id: String, created_at: DateTime<Utc>) -> IdeaRecord {
        IdeaRecord {
            id,
            name: self.name,
            name_localized: self.name_localized,
            summary: self.summary,
            problem: self.problem,
            opportunity: self.opportunity,
            target_users: self.target_users,
            ai_capabilities: self.ai_capabilities,
            key_features: self.key_features,
            technical_approach: self.technical_approach,
            created_at,
            status: IdeaStatus::Pending,
        }
    }
}

// ---------------------------------------------------------------------------
// IdeaRecord
// ---------------------------------------------------------------------------

/// An accepted idea, as stored in history and handed downstream.
///
/// The aliases let older `ideas.json` files, written with the prompt's raw
/// key names, load without migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, alias = "name_hindi")]
    pub name_localized: String,
    #[serde(alias = "short_description")]
    pub summary: String,
    #[serde(default, alias = "pain_point")]
    pub problem: String,
    #[serde(default)]
    pub opportunity: String,
    #[serde(default)]
    pub target_users: String,
    #[serde(default, alias = "ai_features")]
    pub ai_capabilities: Vec<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub technical_approach: String,
    #[serde(default = "epoch", deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: IdeaStatus,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// RFC 3339, or a naive ISO timestamp (no offset) read as UTC. `null` reads
/// as the epoch, same as a missing key.
fn lenient_timestamp<'de, D>(de: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(de)? else {
        return Ok(epoch());
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|n| n.and_utc())
        .map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// Field synonyms
// ---------------------------------------------------------------------------

// Candidate raw keys per canonical field, checked in order.
pub const NAME_KEYS: &[&str] = &["name", "tool_name", "idea", "title"];
pub const NAME_LOCALIZED_KEYS: &[&str] = &["name_localized", "name_hindi", "hindi_name"];
pub const SUMMARY_KEYS: &[&str] = &["short_description", "description", "summary"];
pub const PROBLEM_KEYS: &[&str] = &["pain_point", "problem", "challenge"];
pub const OPPORTUNITY_KEYS: &[&str] = &["opportunity", "benefit", "value", "potential_impact"];
pub const TARGET_USERS_KEYS: &[&str] = &["target_users", "users", "audience"];
pub const AI_CAPABILITIES_KEYS: &[&str] = &["ai_features", "ai_capabilities"];
pub const KEY_FEATURES_KEYS: &[&str] = &["key_features", "features"];
pub const TECHNICAL_APPROACH_KEYS: &[&str] = &["technical_approach", "technology", "implementation"];

/// Map a raw JSON object with arbitrary key spellings onto the canonical
/// schema. Never fails: missing fields become empty (or their default) and
/// validation is left to the caller.
pub fn resolve_fields(raw: &Map<String, Value>, cfg: &IdeasConfig) -> IdeaDraft {
    let langs = &cfg.languages;
    let text = |keys: &[&str]| {
        first_present(raw, keys)
            .map(|v| text_of(v, &langs.primary))
            .unwrap_or_default()
    };
    let list = |keys: &[&str]| first_present(raw, keys).map(list_of).unwrap_or_default();

    let target_users = match first_present(raw, TARGET_USERS_KEYS) {
        Some(v) => text_of(v, &langs.primary),
        None => cfg.default_target_users.clone(),
    };

    IdeaDraft {
        name: text(NAME_KEYS),
        name_localized: localized_name(raw, langs),
        summary: text(SUMMARY_KEYS),
        problem: text(PROBLEM_KEYS),
        opportunity: text(OPPORTUNITY_KEYS),
        target_users,
        ai_capabilities: list(AI_CAPABILITIES_KEYS),
        key_features: list(KEY_FEATURES_KEYS),
        technical_approach: text(TECHNICAL_APPROACH_KEYS),
    }
}

/// The secondary-language name. A language-keyed `name` mapping wins over
/// the flat synonyms; a mapping with no secondary tag does not blank the
/// result, the flat synonyms still apply.
fn localized_name(raw: &Map<String, Value>, langs: &LanguageConfig) -> String {
    if let Some(Value::Object(by_lang)) = first_present(raw, NAME_KEYS) {
        if let Some(s) = lookup_language(by_lang, &langs.secondary) {
            return s;
        }
    }
    first_present(raw, NAME_LOCALIZED_KEYS)
        .map(|v| text_of(v, &langs.secondary))
        .unwrap_or_default()
}

/// First candidate key whose value is present and non-empty.
fn first_present<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .find(|v| is_truthy(v))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn lookup_language(by_lang: &Map<String, Value>, keys: &[String]) -> Option<String> {
    keys.iter()
        .filter_map(|k| by_lang.get(k.as_str()))
        .find(|v| is_truthy(v))
        .map(|v| text_of(v, &[]))
}

/// Render a scalar field as text. Mappings keyed by language tag yield the
/// first matching tag; other mappings fall back to their JSON text.
fn text_of(v: &Value, lang_keys: &[String]) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Object(o) => lookup_language(o, lang_keys).unwrap_or_else(|| v.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|i| text_of(i, lang_keys))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(_) | Value::Number(_) => v.to_string(),
    }
}

/// Coerce a list field: arrays map element-wise, scalars wrap into a
/// single-element list.
fn list_of(v: &Value) -> Vec<String> {
    let items: Vec<&Value> = match v {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|i| match i {
            Value::String(s) => s.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .filter(|s| !s.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
