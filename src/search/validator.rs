use super::form::SearchCriteria;
use crate::util::parse_to_number;

pub const TITLE_REQUIRED: &str = "Enter title";
pub const WRONG_YEAR: &str = "Wrong year";

pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2050;

/// Advisory messages for the search form. They never block a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors {
    pub title: Option<String>,
    pub year: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none()
    }
}

/// How the year field is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearRule {
    /// `year >= 1900 || year <= 2050`, which every number satisfies.
    #[default]
    Permissive,
    /// A non-empty year must lie in `1900..=2050`.
    Range,
}

impl YearRule {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            YearRule::Range
        } else {
            YearRule::Permissive
        }
    }

    fn accepts(&self, raw: &str) -> bool {
        let year = parse_to_number(Some(raw), 0);
        match self {
            YearRule::Permissive => year >= MIN_YEAR || year <= MAX_YEAR,
            YearRule::Range => raw.trim().is_empty() || (MIN_YEAR..=MAX_YEAR).contains(&year),
        }
    }
}

pub fn validate(criteria: &SearchCriteria, rule: YearRule) -> FormErrors {
    let title = criteria
        .title
        .is_empty()
        .then(|| TITLE_REQUIRED.to_string());
    let year = (!rule.accepts(&criteria.year)).then(|| WRONG_YEAR.to_string());

    FormErrors { title, year }
}
