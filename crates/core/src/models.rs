use crate::error::FailureKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result tag from the wire. Tags other than `course` and `blog` are kept
/// verbatim in `Other` so that a newer backend does not lose results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ResultKind {
    Course,
    Blog,
    Other(String),
}

impl Default for ResultKind {
    fn default() -> Self {
        ResultKind::Other(String::new())
    }
}

impl From<String> for ResultKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "course" => ResultKind::Course,
            "blog" => ResultKind::Blog,
            _ => ResultKind::Other(value),
        }
    }
}

impl From<ResultKind> for String {
    fn from(value: ResultKind) -> Self {
        match value {
            ResultKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl ResultKind {
    pub fn as_str(&self) -> &str {
        match self {
            ResultKind::Course => "course",
            ResultKind::Blog => "blog",
            ResultKind::Other(tag) => tag.as_str(),
        }
    }
}

/// One hit as sent by the endpoint. Missing fields decode to empty values and
/// unknown fields are kept in `extra`, so a result list passes through as is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ResultKind,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ResultKind,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            snippet: snippet.into(),
            thumbnail: None,
            extra: Map::new(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Navigation target for a selected result. Unknown tags route to the
    /// search page with the id as query.
    pub fn route(&self) -> String {
        match &self.kind {
            ResultKind::Course => format!("/courses/{}", self.id),
            ResultKind::Blog => format!("/blog/{}", self.id),
            ResultKind::Other(_) => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                query.append_pair("q", &self.id);
                format!("/search?{}", query.finish())
            }
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Completed,
    QueryTooShort,
    Canned { keyword: String },
    Fallback,
    Failed(FailureKind),
}

/// Everything a search box needs to render the result of one `search` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub status: SearchStatus,
    pub attempts: u32,
    pub total_results: Option<u64>,
}

impl SearchOutcome {
    pub(crate) fn without_io(results: Vec<SearchResult>, status: SearchStatus) -> Self {
        Self {
            results,
            status,
            attempts: 0,
            total_results: None,
        }
    }

    pub fn too_short() -> Self {
        Self::without_io(Vec::new(), SearchStatus::QueryTooShort)
    }

    /// True when the list is a fallback or empty because the endpoint failed,
    /// as opposed to a genuine "nothing matched".
    pub fn is_error(&self) -> bool {
        matches!(self.status, SearchStatus::Fallback | SearchStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self.status {
            SearchStatus::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}
