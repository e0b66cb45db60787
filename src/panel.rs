use crate::present::DisplayModel;
use std::fmt::Write as _;
use std::io::Write;
use std::time::{Duration, Instant};

/// Width in characters of a full-height histogram bar
const BAR_WIDTH: usize = 30;

/// Transient, auto-dismissing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
        }
    }
}

/// Where the coordinator shows its output
pub trait Panel {
    /// Replace the panel content
    fn render(&mut self, category: &str, model: &DisplayModel);

    /// Show a transient notice
    fn notify(&mut self, notice: Notice);

    /// Show a blocking error notice
    fn alert(&mut self, message: &str);

    /// Update the unit calculator total after the area quantity changed
    fn update_total(&mut self, quantity: f64, total: &str);
}

/// Panel writing plain text to a terminal
pub struct TerminalPanel<W: Write> {
    out: W,
    notices: Vec<(Notice, Instant)>,
}

impl TerminalPanel<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalPanel<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            notices: Vec::new(),
        }
    }

    /// Notices that have not yet expired
    pub fn active_notices(&mut self) -> Vec<&Notice> {
        self.prune_notices();
        self.notices.iter().map(|(notice, _)| notice).collect()
    }

    fn prune_notices(&mut self) {
        let now = Instant::now();
        self.notices
            .retain(|(notice, shown)| now.duration_since(*shown) < notice.duration);
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            ::log::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> Panel for TerminalPanel<W> {
    /// Redraws the panel followed by the notices that are still showing
    fn render(&mut self, category: &str, model: &DisplayModel) {
        let mut text = render_text(category, model);
        for notice in self.active_notices() {
            let _ = writeln!(text, "  * {}", notice.message);
        }
        self.write(&text);
    }

    fn notify(&mut self, notice: Notice) {
        self.prune_notices();
        let line = format!(">> {}\n", notice.message);
        self.write(&line);
        self.notices.push((notice, Instant::now()));
    }

    fn alert(&mut self, message: &str) {
        let line = format!("!! {}\n", message);
        self.write(&line);
    }

    fn update_total(&mut self, quantity: f64, total: &str) {
        let line = format!("{} m² = {}\n", quantity, total);
        self.write(&line);
    }
}

/// Render a display model as text
pub fn render_text(category: &str, model: &DisplayModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Listing Analyzer ===");
    let _ = writeln!(out, "{}", category);

    let view = match model {
        DisplayModel::NoData => {
            let _ = writeln!(out, "No listings found.");
            return out;
        }
        DisplayModel::Summary(view) => view,
    };

    let _ = writeln!(out, "Listings analyzed:      {}", view.count);
    let _ = writeln!(out, "Mean price per m²:      {}", view.mean_price_per_area);
    let _ = writeln!(out, "Median price per m²:    {}", view.median_price_per_area);
    let _ = writeln!(out, "Most common per m²:     {}", view.modal_price_per_area);
    if let Some(calculator) = &view.calculator {
        let _ = writeln!(
            out,
            "  {} m² = {}",
            calculator.quantity(),
            calculator.total_display()
        );
    }
    let _ = writeln!(out, "Lowest price:           {}", view.min_price);
    let _ = writeln!(out, "Highest price:          {}", view.max_price);

    let _ = writeln!(out, "Price per m² distribution:");
    for bar in &view.bars {
        let width = (bar.height_percent / 100.0 * BAR_WIDTH as f64).round() as usize;
        let count = if bar.count > 0 {
            bar.count.to_string()
        } else {
            String::new()
        };
        let _ = writeln!(out, "  {:>14} |{} {}", bar.label, "#".repeat(width), count);
    }
    let _ = writeln!(out, "  {} .. {}", view.range_start, view.range_end);
    out
}
