use std::fmt;
use std::str::FromStr;

use crate::config::DefaultsConfig;
use crate::omdb::SearchQuery;
use crate::util::{parse_optional_number, QueryParams};

/// The user-supplied title/year pair driving a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchCriteria {
    pub title: String,
    pub year: String,
}

impl SearchCriteria {
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
        }
    }

    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self::new(defaults.title.clone(), defaults.year_text())
    }

    /// Read `title` and `year` from query parameters, falling back to
    /// `defaults` for each one that is missing.
    pub fn from_query(params: &QueryParams, defaults: &DefaultsConfig) -> Self {
        Self {
            title: params
                .get("title")
                .map(str::to_string)
                .unwrap_or_else(|| defaults.title.clone()),
            year: params
                .get("year")
                .map(str::to_string)
                .unwrap_or_else(|| defaults.year_text()),
        }
    }

    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            Field::Title => Self {
                title: value,
                ..self.clone()
            },
            Field::Year => Self {
                year: value,
                ..self.clone()
            },
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Year => &self.year,
        }
    }

    /// Build the search request for `page`. A year that is not a number
    /// means "no year filter".
    pub fn to_query(&self, page: u32) -> SearchQuery {
        SearchQuery::new(
            self.title.clone(),
            parse_optional_number(Some(&self.year), None),
            page,
        )
    }

    pub fn query_string(&self) -> String {
        format!(
            "title={}&year={}",
            urlencoding::encode(&self.title),
            urlencoding::encode(&self.year)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Year,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Year => "year",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Field::Title),
            "year" => Ok(Field::Year),
            other => Err(FieldError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown form field: {0}")]
    Unknown(String),
}

/// The navigable location (address bar) the form is mirrored into.
pub trait Location: Send {
    fn path(&self) -> String;
    fn query(&self) -> QueryParams;
    /// Replace the current history entry without navigating.
    fn replace(&mut self, path_and_query: &str);
}

/// In-memory location with a history stack.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<String>,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            entries: vec![href.into()],
        }
    }

    pub fn href(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or("/")
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Add a new history entry, as a full navigation would.
    pub fn push(&mut self, href: impl Into<String>) {
        self.entries.push(href.into());
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> String {
        let href = self.href();
        href.split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(href)
            .to_string()
    }

    fn query(&self) -> QueryParams {
        self.href()
            .split_once('?')
            .map(|(_, query)| QueryParams::parse(query))
            .unwrap_or_default()
    }

    fn replace(&mut self, path_and_query: &str) {
        match self.entries.last_mut() {
            Some(current) => *current = path_and_query.to_string(),
            None => self.entries.push(path_and_query.to_string()),
        }
    }
}

/// Owns the search criteria and keeps the location's query string in sync.
pub struct FormController<L: Location> {
    location: L,
    defaults: DefaultsConfig,
    criteria: SearchCriteria,
}

impl<L: Location> FormController<L> {
    pub fn new(location: L, defaults: DefaultsConfig) -> Self {
        let criteria = SearchCriteria::from_query(&location.query(), &defaults);
        Self {
            location,
            defaults,
            criteria,
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn on_field_change(&mut self, field: Field, value: impl Into<String>) -> &SearchCriteria {
        let criteria = self.criteria.with(field, value);
        self.commit(criteria)
    }

    pub fn on_named_field_change(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<&SearchCriteria, FieldError> {
        let field = name.parse()?;
        Ok(self.on_field_change(field, value))
    }

    /// Restore the configured defaults.
    pub fn reset(&mut self) -> &SearchCriteria {
        let criteria = SearchCriteria::from_defaults(&self.defaults);
        self.commit(criteria)
    }

    fn commit(&mut self, criteria: SearchCriteria) -> &SearchCriteria {
        let href = format!("{}?{}", self.location.path(), criteria.query_string());
        self.location.replace(&href);
        self.criteria = criteria;
        &self.criteria
    }
}
