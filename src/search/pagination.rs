//! Incremental pagination over a provider's result set.
//!
//! The controller is a plain state machine: events go in, fetch requests
//! come out, and the caller runs the fetches and reports back with
//! [`PaginationController::on_page_resolved`]. Every request carries a
//! [`RequestToken`]; a response whose token is not the one currently in
//! flight is dropped, so a slow response for old criteria can never
//! overwrite newer results.

use tracing::debug;

use super::form::SearchCriteria;
use crate::omdb::{Movie, MovieSearchResponse, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Criteria changed, page 1 is being fetched and will replace `movies`.
    FetchingFresh,
    /// The next page is being fetched and will be appended to `movies`.
    FetchingNext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub generation: u64,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Fresh,
    Next,
}

/// A fetch the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub kind: FetchKind,
    pub query: SearchQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Replaced { count: usize },
    Appended { count: usize },
    /// The response belonged to a superseded request.
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    pub page: u32,
    pub phase: Phase,
    pub total_results: u64,
    pub movies: Vec<Movie>,
}

impl PaginationState {
    pub fn is_loading(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// All results the provider reported have been accumulated.
    pub fn is_exhausted(&self) -> bool {
        self.movies.len() as u64 >= self.total_results
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            phase: Phase::Idle,
            total_results: 0,
            movies: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct PaginationController {
    state: PaginationState,
    criteria: Option<SearchCriteria>,
    generation: u64,
    in_flight: Option<RequestToken>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start idle on page 1 with a first page that was fetched elsewhere
    /// (server-side rendering), so no initial fetch is needed.
    pub fn preloaded(criteria: SearchCriteria, first_page: MovieSearchResponse) -> Self {
        Self {
            state: PaginationState {
                page: 1,
                phase: Phase::Idle,
                total_results: first_page.total_results,
                movies: first_page.result,
            },
            criteria: Some(criteria),
            generation: 1,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn criteria(&self) -> Option<&SearchCriteria> {
        self.criteria.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight
    }

    /// Restart from page 1 when `title` or `year` differ from the current
    /// criteria. Returns the fresh fetch to perform, or `None` when nothing
    /// changed.
    pub fn on_criteria_changed(&mut self, criteria: &SearchCriteria) -> Option<FetchRequest> {
        if self.criteria.as_ref() == Some(criteria) {
            return None;
        }

        self.generation += 1;
        self.criteria = Some(criteria.clone());
        self.state.page = 1;
        self.state.phase = Phase::FetchingFresh;

        let token = RequestToken {
            generation: self.generation,
            page: 1,
        };
        if let Some(stale) = self.in_flight.replace(token) {
            debug!(
                generation = stale.generation,
                page = stale.page,
                "Superseding in-flight fetch"
            );
        }

        Some(FetchRequest {
            token,
            kind: FetchKind::Fresh,
            query: criteria.to_query(1),
        })
    }

    /// Move to the next page unless a fetch is running or every result has
    /// been loaded.
    pub fn on_advance_requested(&mut self) -> Option<FetchRequest> {
        if self.state.is_loading() || self.state.is_exhausted() {
            return None;
        }
        let criteria = self.criteria.as_ref()?;

        self.state.page += 1;
        self.state.phase = Phase::FetchingNext;

        let token = RequestToken {
            generation: self.generation,
            page: self.state.page,
        };
        self.in_flight = Some(token);

        debug!(page = token.page, loaded = self.state.movies.len(), "Fetching next page");

        Some(FetchRequest {
            token,
            kind: FetchKind::Next,
            query: criteria.to_query(token.page),
        })
    }

    pub fn on_page_resolved(
        &mut self,
        token: RequestToken,
        response: MovieSearchResponse,
    ) -> Resolution {
        if self.in_flight != Some(token) {
            debug!(
                generation = token.generation,
                page = token.page,
                current = self.generation,
                "Discarding stale page"
            );
            return Resolution::Discarded;
        }

        let count = response.result.len();
        let resolution = match self.state.phase {
            Phase::FetchingNext => {
                self.state.movies.extend(response.result);
                Resolution::Appended { count }
            }
            Phase::FetchingFresh | Phase::Idle => {
                self.state.movies = response.result;
                Resolution::Replaced { count }
            }
        };

        self.state.total_results = response.total_results;
        self.state.phase = Phase::Idle;
        self.in_flight = None;

        resolution
    }
}
