use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use super::number::{parse_optional_number, parse_to_number};

/// Query-string parameters with lenient lookups.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    /// Parse a raw query string such as `title=batman&year=1989`.
    /// A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let map = serde_urlencoded::from_str::<HashMap<String, String>>(query.trim_start_matches('?'))
            .unwrap_or_default();
        QueryParams { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val.as_str());
        }

        // Retry with the first letter uppercased (`Title` for `title`).
        let mut chars = key.chars();
        let first = chars.next()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let key2: String = first.to_ascii_uppercase().to_string() + chars.as_str();
        self.map.get(&key2).map(|x| x.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn number(&self, key: &str, fallback: i64) -> i64 {
        parse_to_number(self.get(key), fallback)
    }

    pub fn optional_number(&self, key: &str, fallback: Option<i64>) -> Option<i64> {
        parse_optional_number(self.get(key), fallback)
    }
}
