use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Poster value the provider uses when it has no image.
pub const NO_POSTER: &str = "N/A";

/// A movie record as returned by the provider. Fields we do not model are
/// kept in `extra` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Movie {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    pub fn poster_url(&self) -> Option<&str> {
        if self.poster.is_empty() || self.poster == NO_POSTER {
            None
        } else {
            Some(&self.poster)
        }
    }
}

/// One page of search results plus the provider's total count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MovieSearchResponse {
    #[serde(default)]
    pub result: Vec<Movie>,
    #[serde(rename = "totalResults", default, deserialize_with = "lenient_count")]
    pub total_results: u64,
}

impl MovieSearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Parameters of a single search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>, year: Option<i64>, page: u32) -> Self {
        Self {
            title: Some(title.into()),
            year,
            page: page.max(1),
        }
    }
}

/// Raw search payload from the provider.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPayload {
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<Movie>>,
    #[serde(rename = "totalResults", default, deserialize_with = "lenient_count")]
    pub total_results: u64,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl From<SearchPayload> for MovieSearchResponse {
    fn from(payload: SearchPayload) -> Self {
        Self {
            result: payload.search.unwrap_or_default(),
            total_results: payload.total_results,
        }
    }
}

/// Accept a count as a JSON number, a numeric string, or null.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
