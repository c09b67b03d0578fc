//! Display model for the lookup page.
//!
//! # Design
//! Everything here is already formatted text: a host only lays cells out,
//! it never formats numbers. Tables are fixed-arity rows so the placement
//! grid keeps its 2x4 shape through an explicit `Cell::Empty` instead of a
//! blank string.

use std::fmt;

use crate::types::{MemberStats, Placement};

const UNKNOWN: &str = "不明";
const NO_DATA: &str = "データなし";
const PERIOD_PENDING: &str = "準備チュ";

/// The one-line status area above the results panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusMessage {
    #[default]
    Clear,
    InputRequired,
    NotFound,
    DomainError(String),
    TransportError(String),
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Clear => Ok(()),
            StatusMessage::InputRequired => write!(f, "名前を入力してねっ"),
            StatusMessage::NotFound => write!(f, "データは見つからないよっ"),
            StatusMessage::DomainError(text) => write!(f, "エラー: {text}"),
            StatusMessage::TransportError(text) => write!(f, "成績更新チュ♡今は見れません ({text})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// Present only to keep the grid rectangular; hosts should not draw it.
    Empty,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            Cell::Empty => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<const N: usize> {
    pub kind: RowKind,
    pub cells: [Cell; N],
}

/// Alternating header and data rows, `N` cells each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<const N: usize> {
    pub rows: Vec<Row<N>>,
}

impl<const N: usize> Table<N> {
    fn new(sections: Vec<([Cell; N], [Cell; N])>) -> Self {
        let rows = sections
            .into_iter()
            .flat_map(|(header, data)| {
                [
                    Row {
                        kind: RowKind::Header,
                        cells: header,
                    },
                    Row {
                        kind: RowKind::Data,
                        cells: data,
                    },
                ]
            })
            .collect();
        Self { rows }
    }

    pub fn columns(&self) -> usize {
        N
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = f64::from(self.a) / 255.0;
        write!(f, "rgba({},{},{},{alpha})", self.r, self.g, self.b)
    }
}

/// One color per `Placement`, warm for good finishes and cool for bad ones.
pub const PIE_PALETTE: [Rgba; 7] = [
    Rgba::opaque(240, 122, 122),
    Rgba::opaque(240, 158, 109),
    Rgba::opaque(240, 217, 109),
    Rgba::opaque(181, 217, 109),
    Rgba::opaque(109, 194, 122),
    Rgba::opaque(109, 194, 181),
    Rgba::opaque(109, 158, 217),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    /// Rate scaled to a percentage.
    pub value: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub slices: [PieSlice; 7],
}

impl PieChart {
    pub fn from_stats(stats: &MemberStats) -> Self {
        Self {
            slices: Placement::ALL.map(|placement| PieSlice {
                label: placement.rate_key(),
                value: stats.placement_rate(placement) * 100.0,
                color: PIE_PALETTE[placement.index()],
            }),
        }
    }
}

/// The results panel for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub period: String,
    pub tally: String,
    pub member_line: String,
    pub rankings: Table<5>,
    pub score_summary: Table<5>,
    pub placement_counts: Table<4>,
    pub pie: PieChart,
}

impl ResultsView {
    pub fn from_stats(stats: &MemberStats) -> Self {
        Self {
            period: stats
                .last_updated
                .clone()
                .unwrap_or_else(|| PERIOD_PENDING.to_string()),
            tally: format!(
                "集計人数: {} 人",
                stats
                    .tally_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string())
            ),
            member_line: member_line(stats),
            rankings: rankings_table(stats),
            score_summary: score_table(stats),
            placement_counts: placement_table(stats),
            pie: PieChart::from_stats(stats),
        }
    }
}

fn member_line(stats: &MemberStats) -> String {
    let number = stats
        .member_no
        .map(|n| format!("{n:04}"))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let name = stats.name.as_deref().unwrap_or(UNKNOWN);
    format!("No. {number}   {name}")
}

/// Fixed-point text with `digits` decimals. An exact tie rounds away from
/// zero (`2.0625` -> `2.063`), where `{:.3}` would round it to even.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let magnitude = value.abs();
    let mut text = if is_decimal_tie(magnitude, digits) {
        // Exactly `digits + 1` decimals, the last one a 5.
        let exact = format!("{magnitude:.prec$}", prec = digits + 1);
        let kept = exact[..exact.len() - 1].trim_end_matches('.');
        increment_last_digit(kept)
    } else {
        format!("{magnitude:.digits$}")
    };
    if value < 0.0 {
        text.insert(0, '-');
    }
    text
}

/// Whether `magnitude * 10^digits` lies exactly halfway between integers.
/// With `magnitude = m * 2^e` that holds when `m` has exactly
/// `-(e + 1 + digits)` trailing zero bits.
fn is_decimal_tie(magnitude: f64, digits: usize) -> bool {
    let bits = magnitude.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    mantissa != 0 && i64::from(mantissa.trailing_zeros()) == -(exponent + 1 + digits as i64)
}

fn increment_last_digit(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for c in chars.iter_mut().rev() {
        match c.to_digit(10) {
            Some(9) => *c = '0',
            Some(d) => {
                *c = char::from(b'0' + d as u8 + 1);
                return chars.into_iter().collect();
            }
            None => {}
        }
    }
    std::iter::once('1').chain(chars).collect()
}

fn format_rank(rank: Option<f64>) -> Cell {
    match rank {
        Some(rank) => Cell::text(format!("{}位", to_fixed(rank, 0))),
        None => Cell::text(NO_DATA),
    }
}

fn rankings_table(stats: &MemberStats) -> Table<5> {
    let r = &stats.rankings;
    Table::new(vec![(
        [
            Cell::text("累計半荘数\nランキング"),
            Cell::text("総スコア\nランキング"),
            Cell::text("最高スコア\nランキング"),
            Cell::text("平均スコア\nランキング"),
            Cell::text("平均着順\nランキング"),
        ],
        [
            format_rank(r.hanchan_count),
            format_rank(r.total_score),
            format_rank(r.max_score),
            format_rank(r.average_score),
            format_rank(r.average_placement),
        ],
    )])
}

fn score_table(stats: &MemberStats) -> Table<5> {
    let s = &stats.summary;
    Table::new(vec![(
        [
            Cell::text("累計半荘数"),
            Cell::text("総スコア"),
            Cell::text("最高スコア"),
            Cell::text("平均スコア"),
            Cell::text("平均着順"),
        ],
        [
            Cell::text(format!("{}半荘", to_fixed(s.hanchan_count, 0))),
            Cell::text(format!("{}pt", to_fixed(s.total_score, 1))),
            Cell::text(format!("{}pt", to_fixed(s.max_score, 1))),
            Cell::text(format!("{}pt", to_fixed(s.average_score, 3))),
            Cell::text(format!("{}位", to_fixed(s.average_placement, 3))),
        ],
    )])
}

fn placement_table(stats: &MemberStats) -> Table<4> {
    use Placement::*;
    let header = |p: Placement| Cell::text(p.count_key());
    let count = |p: Placement| Cell::text(format!("{}回", stats.placement_count(p)));
    Table::new(vec![
        (
            [header(First), header(Second), header(Third), header(Fourth)],
            [count(First), count(Second), count(Third), count(Fourth)],
        ),
        (
            [header(FirstHalf), header(SecondHalf), header(ThirdHalf), Cell::Empty],
            [count(FirstHalf), count(SecondHalf), count(ThirdHalf), Cell::Empty],
        ),
    ])
}
