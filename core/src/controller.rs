//! One lookup at a time: validation, request, outcome mapping and the
//! reconciliation of the response with the progress indicator.
//!
//! # Design
//! `LookupController` is sans-IO like the rest of the crate. `submit` hands
//! back the `HttpRequest` to execute together with a `RequestId`; the host
//! reports the outcome through `complete` and calls `poll` from its frame
//! loop. Finalization runs on every path that ends a request (response,
//! transport failure, timeout): it marks data as arrived and stops the
//! indicator in the same call, so the bar can never be left parked.
//!
//! A second non-blank `submit` while a request is in flight is rejected with
//! `LookupError::Busy`; a response for a request that already ended (for
//! example after a timeout) is dropped.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::animator::LoadingAnimator;
use crate::client::ScoreClient;
use crate::config::LookupConfig;
use crate::error::{LookupError, TransportFailure};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{LookupResult, MemberStats, SearchQuery};
use crate::view::{ResultsView, StatusMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Validating,
    AwaitingResponse,
    Rendering,
    ShowingError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// A request the host must execute, then report back via `complete`.
#[derive(Debug, Clone)]
pub struct PendingLookup {
    pub id: RequestId,
    pub request: HttpRequest,
}

#[derive(Debug)]
struct InFlight {
    id: RequestId,
    query: SearchQuery,
    issued_at: Instant,
}

#[derive(Debug)]
pub struct LookupController {
    client: ScoreClient,
    config: LookupConfig,
    animator: LoadingAnimator,
    phase: RequestPhase,
    next_id: u64,
    in_flight: Option<InFlight>,
    status: StatusMessage,
    results: Option<ResultsView>,
    last_result: Option<LookupResult>,
}

impl LookupController {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            client: ScoreClient::new(&config.endpoint),
            animator: LoadingAnimator::new(config.animation),
            config,
            phase: RequestPhase::Idle,
            next_id: 0,
            in_flight: None,
            status: StatusMessage::Clear,
            results: None,
            last_result: None,
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// The results panel; `None` while hidden.
    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn last_result(&self) -> Option<&LookupResult> {
        self.last_result.as_ref()
    }

    pub fn animator(&self) -> &LoadingAnimator {
        &self.animator
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Instant at which the in-flight request times out.
    pub fn request_deadline(&self) -> Option<Instant> {
        self.in_flight
            .as_ref()
            .map(|f| f.issued_at + self.config.request_timeout)
    }

    /// Validate `raw` and, when it names someone, start the indicator and
    /// return the request to execute.
    ///
    /// A blank name always sets the input-required status, even while
    /// another lookup is in flight; that lookup keeps running.
    pub fn submit(&mut self, raw: &str, now: Instant) -> Result<PendingLookup, LookupError> {
        let idle = !self.is_busy();
        if idle {
            self.transition(RequestPhase::Validating);
        }
        let query = match SearchQuery::parse(raw) {
            Ok(query) => query,
            Err(err) => {
                self.status = StatusMessage::InputRequired;
                self.results = None;
                if idle {
                    self.transition(RequestPhase::Idle);
                }
                return Err(err);
            }
        };

        if let Some(in_flight) = &self.in_flight {
            warn!(pending = in_flight.query.as_str(), "ignoring submit while a lookup is in flight");
            return Err(LookupError::Busy);
        }

        self.status = StatusMessage::Clear;
        self.results = None;
        self.animator.start(now);

        self.next_id += 1;
        let id = RequestId(self.next_id);
        let request = self.client.build_lookup(&query);
        info!(name = query.as_str(), ?id, "lookup started");
        self.in_flight = Some(InFlight {
            id,
            query,
            issued_at: now,
        });
        self.transition(RequestPhase::AwaitingResponse);

        Ok(PendingLookup { id, request })
    }

    /// Apply the outcome of request `id`. Returns `None` when the request is
    /// no longer in flight and the outcome was dropped.
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<HttpResponse, TransportFailure>,
        now: Instant,
    ) -> Option<&LookupResult> {
        if self.in_flight.as_ref().map(|f| f.id) != Some(id) {
            debug!(?id, "dropping response for a finished lookup");
            return None;
        }
        self.in_flight = None;

        let result = outcome
            .map_err(LookupError::from)
            .and_then(|response| self.client.parse_lookup(response));
        self.finish(result, now);
        self.last_result.as_ref()
    }

    /// Frame hook: enforces the request timeout and advances the indicator.
    pub fn poll(&mut self, now: Instant) {
        if let Some(deadline) = self.request_deadline() {
            if now >= deadline {
                let timeout = self.config.request_timeout;
                if let Some(in_flight) = self.in_flight.take() {
                    warn!(name = in_flight.query.as_str(), ?timeout, "lookup timed out");
                }
                let millis = timeout.as_millis();
                self.finish(Err(TransportFailure::Timeout { millis }.into()), now);
            }
        }
        self.animator.advance(now);
    }

    fn finish(&mut self, result: Result<MemberStats, LookupError>, now: Instant) {
        match &result {
            Ok(stats) => {
                self.transition(RequestPhase::Rendering);
                self.status = StatusMessage::Clear;
                self.results = Some(ResultsView::from_stats(stats));
                info!(member = ?stats.member_no, "lookup rendered");
            }
            Err(err) => {
                self.transition(RequestPhase::ShowingError);
                self.status = status_for(err);
                self.results = None;
                info!(error = %err, "lookup failed");
            }
        }
        self.last_result = Some(result.into());

        self.animator.signal_data_arrived();
        self.animator.stop(now);
        self.transition(RequestPhase::Idle);
    }

    fn transition(&mut self, next: RequestPhase) {
        debug!(from = ?self.phase, to = ?next, "request phase");
        self.phase = next;
    }
}

fn status_for(err: &LookupError) -> StatusMessage {
    match err {
        LookupError::InputRequired => StatusMessage::InputRequired,
        LookupError::NotFound(_) => StatusMessage::NotFound,
        LookupError::Domain(message) => StatusMessage::DomainError(message.clone()),
        LookupError::Transport(failure) => StatusMessage::TransportError(failure.to_string()),
        LookupError::Busy => StatusMessage::Clear,
    }
}
