//! Text rendering of the status line and the results panel.
//!
//! Layout only: every string shown here was formatted by the core.

use std::fmt::Write as _;

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell as TableCell, CellAlignment, Color, ContentArrangement, Table};
use score_lookup_core::view::{Cell, PieChart, Rgba, RowKind, Table as ViewTable};
use score_lookup_core::{ResultsView, StatusMessage};

/// Width of a 100% slice in the pie legend.
const LEGEND_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Styling {
    /// ANSI colors and bold headers.
    Terminal,
    Plain,
}

pub fn render_page(status: &StatusMessage, results: Option<&ResultsView>, styling: Styling) -> String {
    let mut out = String::new();
    let status = status.to_string();
    if !status.is_empty() {
        let _ = writeln!(out, "{status}");
    }
    if let Some(view) = results {
        out.push_str(&render_results(view, styling));
    }
    out
}

pub fn render_results(view: &ResultsView, styling: Styling) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.period);
    let _ = writeln!(out, "{}", view.tally);
    let _ = writeln!(out, "{}", view.member_line);
    let _ = writeln!(out, "{}", grid(&view.rankings, styling));
    let _ = writeln!(out, "{}", grid(&view.score_summary, styling));
    let _ = writeln!(out, "{}", grid(&view.placement_counts, styling));
    let _ = writeln!(out, "{}", legend(&view.pie, styling));
    out
}

fn new_table(styling: Styling) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if styling == Styling::Plain {
        table.force_no_tty();
    }
    table
}

fn grid<const N: usize>(source: &ViewTable<N>, styling: Styling) -> Table {
    let mut table = new_table(styling);
    for row in &source.rows {
        table.add_row(row.cells.iter().map(|cell| {
            let out = match cell {
                Cell::Text(text) => TableCell::new(text),
                Cell::Empty => TableCell::new(""),
            }
            .set_alignment(CellAlignment::Center);
            match row.kind {
                RowKind::Header => out.add_attribute(Attribute::Bold),
                RowKind::Data => out,
            }
        }));
    }
    table
}

fn legend(pie: &PieChart, styling: Styling) -> Table {
    let mut table = new_table(styling);
    for slice in &pie.slices {
        let filled = ((slice.value / 100.0) * LEGEND_WIDTH as f64).round().clamp(0.0, LEGEND_WIDTH as f64);
        let bar = "█".repeat(filled as usize);
        table.add_row(vec![
            TableCell::new(&slice.label),
            TableCell::new(format!("{:.1}%", slice.value)).set_alignment(CellAlignment::Right),
            TableCell::new(bar).fg(color(slice.color)),
        ]);
    }
    table
}

fn color(rgba: Rgba) -> Color {
    Color::Rgb {
        r: rgba.r,
        g: rgba.g,
        b: rgba.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_lookup_core::MemberStats;

    fn view() -> ResultsView {
        let mut stats = MemberStats {
            member_no: Some(12),
            name: Some("Tanaka".to_string()),
            ..MemberStats::default()
        };
        stats.placement_rates[0] = 0.5;
        stats.placement_counts[0] = 30.0;
        ResultsView::from_stats(&stats)
    }

    #[test]
    fn page_shows_identity_and_tables() {
        let page = render_page(&StatusMessage::Clear, Some(&view()), Styling::Plain);
        assert!(page.starts_with("準備チュ\n集計人数: 不明 人\nNo. 0012   Tanaka\n"));
        assert!(page.contains("30回"));
        assert!(page.contains("データなし"));
        assert!(page.contains("50.0%"));
        assert!(page.contains(&"█".repeat(15)));
        assert!(!page.contains("\u{1b}["));
    }

    #[test]
    fn status_only_page() {
        let page = render_page(&StatusMessage::NotFound, None, Styling::Plain);
        assert_eq!(page, "データは見つからないよっ\n");
    }

    #[test]
    fn cleared_status_renders_nothing() {
        assert_eq!(render_page(&StatusMessage::Clear, None, Styling::Plain), "");
    }

    #[test]
    fn rendering_twice_is_identical() {
        let view = view();
        assert_eq!(
            render_results(&view, Styling::Plain),
            render_results(&view, Styling::Plain)
        );
    }
}
