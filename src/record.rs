use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder used wherever a zone or job type label is missing.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Company {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default)]
    pub name: Option<String>,
}

/// One job posting as returned by the listing API.
///
/// Only `id` is required on the wire. Everything else falls back to the
/// accessor defaults below instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JobRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    // The detail endpoint names the text `description`; listings use `body`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "wage_as_text")]
    pub wage: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl JobRecord {
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn body_text(&self) -> &str {
        self.body
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Location names in source order; unnamed entries are skipped.
    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().filter_map(|l| l.name.as_deref())
    }

    /// Label used for zone statistics. The source has no job type taxonomy,
    /// so the free-text title is the label.
    pub fn job_type_label(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN)
    }
}

// The API sends wage either as a string or a bare number, or null.
fn wage_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
