//! Domain types for a member lookup.
//!
//! # Design
//! The backend is a spreadsheet behind a web app, so any field may be
//! missing, `null`, a number or a numeric string. `MemberStats::from_record`
//! is the single place where those shapes are collapsed: identity and
//! ranking fields become `Option`, statistics, counts and rates become `0`.
//! Nothing downstream ever sees a non-finite number.

use serde_json::{Map, Value};

use crate::error::{LookupError, TransportFailure};

/// A trimmed, non-empty display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim `raw` and reject it when nothing is left.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(LookupError::InputRequired);
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Finishing positions, including the half steps produced by tie splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    FirstHalf,
    Second,
    SecondHalf,
    Third,
    ThirdHalf,
    Fourth,
}

impl Placement {
    /// Chart order: best to worst.
    pub const ALL: [Placement; 7] = [
        Placement::First,
        Placement::FirstHalf,
        Placement::Second,
        Placement::SecondHalf,
        Placement::Third,
        Placement::ThirdHalf,
        Placement::Fourth,
    ];

    fn rank_label(self) -> &'static str {
        match self {
            Placement::First => "1",
            Placement::FirstHalf => "1.5",
            Placement::Second => "2",
            Placement::SecondHalf => "2.5",
            Placement::Third => "3",
            Placement::ThirdHalf => "3.5",
            Placement::Fourth => "4",
        }
    }

    /// Wire key of the count field, e.g. `2.5着の回数`.
    pub fn count_key(self) -> String {
        format!("{}着の回数", self.rank_label())
    }

    /// Wire key of the rate field, e.g. `2.5着率`. Also the chart label.
    pub fn rate_key(self) -> String {
        format!("{}着率", self.rank_label())
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five leaderboards a member is ranked on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rankings {
    pub hanchan_count: Option<f64>,
    pub total_score: Option<f64>,
    pub max_score: Option<f64>,
    pub average_score: Option<f64>,
    pub average_placement: Option<f64>,
}

/// Aggregate statistics over all games a member played.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreSummary {
    pub hanchan_count: f64,
    pub total_score: f64,
    pub max_score: f64,
    pub average_score: f64,
    pub average_placement: f64,
}

/// A member record with every field normalized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberStats {
    /// `None` when absent, non-numeric or zero.
    pub member_no: Option<u64>,
    pub name: Option<String>,
    pub last_updated: Option<String>,
    /// Number of members included in the tally. `None` when absent or zero.
    pub tally_count: Option<u64>,
    pub rankings: Rankings,
    pub summary: ScoreSummary,
    /// Indexed by `Placement::index`. Kept as sent, fractions and negative
    /// values included; only unusable values become `0`.
    pub placement_counts: [f64; 7],
    /// Probabilities in `[0, 1]`, indexed by `Placement::index`.
    pub placement_rates: [f64; 7],
}

impl MemberStats {
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let field = |key: &str| record.get(key);
        let stat = |key: &str| numeric(field(key)).unwrap_or(0.0);

        let mut placement_counts = [0f64; 7];
        let mut placement_rates = [0f64; 7];
        for placement in Placement::ALL {
            placement_counts[placement.index()] = numeric(field(&placement.count_key())).unwrap_or(0.0);
            placement_rates[placement.index()] = numeric(field(&placement.rate_key())).unwrap_or(0.0);
        }

        Self {
            member_no: positive_integer(field("No.")),
            name: text(field("名前")),
            last_updated: text(field("最終更新")).or_else(|| text(field("更新日時"))),
            tally_count: positive_integer(field("集計人数")),
            rankings: Rankings {
                hanchan_count: numeric(field("累計半荘数ランキング")),
                total_score: numeric(field("総スコアランキング")),
                max_score: numeric(field("最高スコアランキング")),
                average_score: numeric(field("平均スコアランキング")),
                average_placement: numeric(field("平均着順ランキング")),
            },
            summary: ScoreSummary {
                hanchan_count: stat("累計半荘数"),
                total_score: stat("総スコア"),
                max_score: stat("最高スコア"),
                average_score: stat("平均スコア"),
                average_placement: stat("平均着順"),
            },
            placement_counts,
            placement_rates,
        }
    }

    pub fn placement_count(&self, placement: Placement) -> f64 {
        self.placement_counts[placement.index()]
    }

    pub fn placement_rate(&self, placement: Placement) -> f64 {
        self.placement_rates[placement.index()]
    }
}

/// Outcome of one lookup, as remembered by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Success(MemberStats),
    NotFound,
    DomainError(String),
    TransportError(TransportFailure),
}

impl From<Result<MemberStats, LookupError>> for LookupResult {
    fn from(result: Result<MemberStats, LookupError>) -> Self {
        match result {
            Ok(stats) => LookupResult::Success(stats),
            Err(LookupError::NotFound(_)) => LookupResult::NotFound,
            Err(LookupError::Transport(failure)) => LookupResult::TransportError(failure),
            Err(LookupError::Domain(message)) => LookupResult::DomainError(message),
            Err(other) => LookupResult::DomainError(other.to_string()),
        }
    }
}

/// A finite number from a JSON number or a numeric string.
fn numeric(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn positive_integer(value: Option<&Value>) -> Option<u64> {
    numeric(value)
        .map(f64::round)
        .filter(|n| *n >= 1.0)
        .map(|n| n as u64)
}

fn text(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}
