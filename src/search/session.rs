use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::form::{Field, FieldError, FormController, Location, SearchCriteria};
use super::pagination::{FetchRequest, PaginationController, PaginationState, RequestToken, Resolution};
use super::scroll::{ScrollSignal, ScrollTrigger, Subscription};
use super::validator::{validate, FormErrors, YearRule};
use crate::config::Config;
use crate::omdb::{MovieSearchResponse, MovieSource};
use crate::view::PageModel;

#[derive(Debug)]
pub enum SessionEvent {
    AdvanceRequested,
    PageResolved {
        token: RequestToken,
        response: MovieSearchResponse,
    },
}

/// What [`SearchSession::pump`] did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Advance { started: bool },
    Page(Resolution),
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub year_rule: YearRule,
    pub scroll: ScrollTrigger,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            year_rule: YearRule::from_strict(config.validation.strict_year),
            scroll: ScrollTrigger::from_config(&config.scroll),
        }
    }
}

/// A single user's search page: form, validation, pagination and the
/// scroll trigger, wired together over a [`MovieSource`].
///
/// Fetches run as tokio tasks and report back through the session's event
/// channel; state only changes inside `&mut self` methods. Must be created
/// inside a tokio runtime.
pub struct SearchSession<L: Location> {
    form: FormController<L>,
    pagination: PaginationController,
    source: Arc<dyn MovieSource>,
    options: SessionOptions,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    pending: usize,
}

impl<L: Location> SearchSession<L> {
    /// Start a session and fetch the first page for the form's criteria.
    pub fn new(form: FormController<L>, source: Arc<dyn MovieSource>, options: SessionOptions) -> Self {
        let mut session = Self::build(form, PaginationController::new(), source, options);
        let criteria = session.form.criteria().clone();
        if let Some(request) = session.pagination.on_criteria_changed(&criteria) {
            session.dispatch(request);
        }
        session
    }

    /// Start a session from a first page that was already fetched.
    pub fn with_first_page(
        form: FormController<L>,
        source: Arc<dyn MovieSource>,
        first_page: MovieSearchResponse,
        options: SessionOptions,
    ) -> Self {
        let pagination = PaginationController::preloaded(form.criteria().clone(), first_page);
        Self::build(form, pagination, source, options)
    }

    fn build(
        form: FormController<L>,
        pagination: PaginationController,
        source: Arc<dyn MovieSource>,
        options: SessionOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            form,
            pagination,
            source,
            options,
            events_tx,
            events_rx,
            pending: 0,
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        self.form.criteria()
    }

    pub fn errors(&self) -> FormErrors {
        validate(self.form.criteria(), self.options.year_rule)
    }

    pub fn pagination(&self) -> &PaginationState {
        self.pagination.state()
    }

    pub fn location(&self) -> &L {
        self.form.location()
    }

    /// Number of fetches started but not yet handled by [`Self::pump`].
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn change_field(&mut self, field: Field, value: impl Into<String>) {
        let criteria = self.form.on_field_change(field, value).clone();
        self.criteria_changed(&criteria);
    }

    pub fn change_named_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let criteria = self.form.on_named_field_change(name, value)?.clone();
        self.criteria_changed(&criteria);
        Ok(())
    }

    pub fn reset(&mut self) {
        let criteria = self.form.reset().clone();
        self.criteria_changed(&criteria);
    }

    /// Request the next page. Returns whether a fetch was started.
    pub fn advance(&mut self) -> bool {
        match self.pagination.on_advance_requested() {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    /// Attach the scroll trigger to `signal`. Qualifying scroll events are
    /// queued as advance requests and applied by [`Self::pump`].
    pub fn mount_scroll(&self, signal: &ScrollSignal) -> Subscription {
        let tx = self.events_tx.clone();
        self.options.scroll.clone().mount(signal, move || {
            let _ = tx.send(SessionEvent::AdvanceRequested);
        })
    }

    /// Handle one queued event, waiting for a running fetch if nothing is
    /// queued yet. Returns `None` once there is nothing left to wait for.
    pub async fn pump(&mut self) -> Option<Handled> {
        let event = if self.pending > 0 {
            self.events_rx.recv().await?
        } else {
            self.events_rx.try_recv().ok()?
        };
        Some(self.handle(event))
    }

    /// Pump until no fetch is running and no event is queued.
    pub async fn settle(&mut self) {
        while self.pump().await.is_some() {}
    }

    pub fn page_model(&self) -> PageModel {
        let state = self.pagination.state();
        PageModel {
            criteria: self.form.criteria().clone(),
            errors: self.errors(),
            total_results: state.total_results,
            movies: state.movies.clone(),
        }
    }

    fn handle(&mut self, event: SessionEvent) -> Handled {
        match event {
            SessionEvent::AdvanceRequested => Handled::Advance {
                started: self.advance(),
            },
            SessionEvent::PageResolved { token, response } => {
                self.pending = self.pending.saturating_sub(1);
                Handled::Page(self.pagination.on_page_resolved(token, response))
            }
        }
    }

    fn criteria_changed(&mut self, criteria: &SearchCriteria) {
        if let Some(request) = self.pagination.on_criteria_changed(criteria) {
            self.dispatch(request);
        }
    }

    fn dispatch(&mut self, request: FetchRequest) {
        debug!(
            generation = request.token.generation,
            page = request.token.page,
            kind = ?request.kind,
            "Dispatching fetch"
        );

        self.pending += 1;
        let source = self.source.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let query = request.query;
            let fetch = tokio::spawn(async move { source.search(&query).await });

            // A fetch that dies still resolves its token, or `pending` never
            // drops back to zero.
            let response = match fetch.await {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        generation = request.token.generation,
                        page = request.token.page,
                        "Fetch task failed: {}",
                        e
                    );
                    MovieSearchResponse::default()
                }
            };
            let _ = tx.send(SessionEvent::PageResolved {
                token: request.token,
                response,
            });
        });
    }
}
