//! Text rendering of the occupancy dashboard.
//!
//! [`Dashboard`] holds view-only state (banner dismissal, panel toggles);
//! everything it draws comes from the [`SyncStatus`] handed to
//! [`Dashboard::render`].

mod banner;
mod cards;
mod map;

use lotsync_client::SyncStatus;
use lotsync_core::{LotTable, Thresholds};

use banner::ErrorBanner;
pub(crate) use cards::render_cards;

const TITLE: &str = "Campus Parking Status";

/// What the interactive loop should do after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum InputAction {
    Redraw,
    Quit,
    Ignore,
}

pub(crate) struct Dashboard {
    lots: LotTable,
    thresholds: Thresholds,
    show_legend: bool,
    show_map: bool,
    map_expanded: bool,
    color: bool,
    banner: ErrorBanner,
}

impl Dashboard {
    pub(crate) fn new(
        lots: LotTable,
        thresholds: Thresholds,
        show_legend: bool,
        show_map: bool,
    ) -> Self {
        Self {
            lots,
            thresholds,
            show_legend,
            show_map,
            map_expanded: true,
            color: false,
            banner: ErrorBanner::default(),
        }
    }

    /// Paints bucket tags with ANSI colours.
    #[must_use]
    pub(crate) fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Feeds a fresh status to view state that tracks changes over time.
    pub(crate) fn observe(&mut self, status: &SyncStatus) {
        self.banner.observe(status);
    }

    /// Interprets one line of keyboard input.
    pub(crate) fn handle_input(&mut self, line: &str) -> InputAction {
        match line.trim().to_ascii_lowercase().as_str() {
            "d" => {
                self.banner.dismiss();
                InputAction::Redraw
            }
            "m" if self.show_map => {
                self.map_expanded = !self.map_expanded;
                InputAction::Redraw
            }
            "r" => InputAction::Redraw,
            "q" => InputAction::Quit,
            _ => InputAction::Ignore,
        }
    }

    pub(crate) fn render(&self, status: &SyncStatus) -> String {
        let mut out = format!("{TITLE}\n{}\n", "=".repeat(TITLE.len()));

        if let Some(message) = self.banner.visible() {
            out.push_str(&format!("! {message}  (d to dismiss)\n"));
        }

        match status.snapshot() {
            None if status.is_loading() => {
                out.push_str("\nLoading parking lot data...\n");
                return out;
            }
            None => {
                out.push_str("\nNo parking data available.\n");
            }
            Some(snapshot) => {
                out.push_str(&format!(
                    "Updated {}\n\n",
                    snapshot.fetched_at.format("%H:%M:%S UTC")
                ));
                if snapshot.records.is_empty() {
                    out.push_str("No parking data available.\n");
                } else {
                    out.push_str(&render_cards(
                        &snapshot.records,
                        &self.lots,
                        &self.thresholds,
                        self.color,
                    ));
                }
            }
        }

        if self.show_legend {
            out.push('\n');
            out.push_str(&self.render_legend());
        }

        if self.show_map {
            out.push('\n');
            if self.map_expanded {
                let records = status.snapshot().map_or(&[][..], |s| s.records.as_slice());
                out.push_str(&map::render_map(records, &self.lots, &self.thresholds));
            } else {
                out.push_str("Campus Map (collapsed, m to expand)\n");
            }
        }

        out
    }

    fn render_legend(&self) -> String {
        let entries: Vec<String> = self
            .thresholds
            .legend()
            .iter()
            .map(|(bucket, range)| format!("{bucket} {range} ({})", bucket.color_name()))
            .collect();
        format!("Legend: {}\n", entries.join(" \u{b7} "))
    }
}
