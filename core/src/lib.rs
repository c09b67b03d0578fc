//! Sans-IO core of the member score lookup page.
//!
//! # Overview
//! Builds the lookup `HttpRequest`, parses the `HttpResponse`, normalizes the
//! member record into display rows and drives the progress indicator, all
//! from host-supplied timestamps. The host executes the HTTP round-trip and
//! owns the clock, which keeps everything here deterministic and testable.
//!
//! # Design
//! - `LookupController` owns one request at a time and one `LoadingAnimator`.
//! - `ScoreClient` is stateless; it holds only the endpoint.
//! - `view` holds pre-formatted text so hosts never format numbers.

pub mod animator;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod types;
pub mod view;

pub use animator::{FrameHandle, Indicator, IndicatorText, LoadingAnimator, LoadingPhase, LoadingState, Wakeup};
pub use client::ScoreClient;
pub use config::{AnimatorConfig, LookupConfig};
pub use controller::{LookupController, PendingLookup, RequestId, RequestPhase};
pub use error::{LookupError, TransportFailure};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{LookupResult, MemberStats, Placement, SearchQuery};
pub use view::{Cell, PieChart, ResultsView, RowKind, StatusMessage, Table};
