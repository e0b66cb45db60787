use crate::config::AnalyzerConfig;
use crate::stats::StatisticsSummary;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Leading decimal number of an input, optionally signed and with an exponent
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());

/// Formats currency amounts as integer-rounded, grouped strings with a fixed prefix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyFormat {
    prefix: String,
    separator: String,
}

impl CurrencyFormat {
    pub fn new(prefix: &str, separator: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            separator: separator.to_string(),
        }
    }

    /// `1933.33` -> `"USD 1.933"`
    pub fn format(&self, value: f64) -> String {
        format!("{} {}", self.prefix, group_digits(value.round(), &self.separator))
    }
}

/// Group the integer part of `value` in threes
fn group_digits(value: f64, separator: &str) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Total price for a user-chosen area at the modal price per area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitCalculator {
    price_per_area: f64,
    quantity: f64,
    format: CurrencyFormat,
}

impl UnitCalculator {
    pub fn new(price_per_area: f64, quantity: f64, format: CurrencyFormat) -> Self {
        Self {
            price_per_area,
            quantity,
            format,
        }
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Update the area from raw input text. The leading number is used ("75m2" is 75);
    /// input without one counts as 0.
    pub fn set_quantity_input(&mut self, input: &str) -> String {
        self.quantity = parse_leading_number(input).unwrap_or(0.0);
        self.total_display()
    }

    pub fn total(&self) -> f64 {
        self.price_per_area * self.quantity
    }

    pub fn total_display(&self) -> String {
        self.format.format(self.total())
    }
}

fn parse_leading_number(input: &str) -> Option<f64> {
    let number = LEADING_NUMBER.find(input.trim_start())?;
    number
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite())
}

/// One bar of the price-per-area distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBar {
    pub label: String,
    pub count: usize,
    /// Height relative to the tallest bar of this redraw, 0..=100
    pub height_percent: f64,
}

/// Display-ready statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub count: usize,
    pub mean_price_per_area: String,
    pub median_price_per_area: String,
    /// "N/A" when no modal value exists
    pub modal_price_per_area: String,
    pub min_price: String,
    pub max_price: String,
    pub bars: Vec<HistogramBar>,
    pub range_start: String,
    pub range_end: String,
    pub calculator: Option<UnitCalculator>,
}

/// What the panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayModel {
    /// No records yet; distinct from a summary full of zeroes
    NoData,
    Summary(SummaryView),
}

impl DisplayModel {
    pub fn calculator_mut(&mut self) -> Option<&mut UnitCalculator> {
        match self {
            DisplayModel::Summary(view) => view.calculator.as_mut(),
            DisplayModel::NoData => None,
        }
    }
}

/// Maps statistics into a display model
#[derive(Debug, Clone)]
pub struct Presenter {
    format: CurrencyFormat,
    bins: usize,
    default_quantity: f64,
}

impl Presenter {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            format: CurrencyFormat::new(&config.currency_code, &config.grouping_separator),
            bins: config.histogram_bins,
            default_quantity: config.default_area_quantity,
        }
    }

    pub fn present(&self, summary: Option<&StatisticsSummary>) -> DisplayModel {
        let Some(summary) = summary else {
            return DisplayModel::NoData;
        };

        // Rebuilt on every redraw so labels always match the current records
        let histogram = summary.histogram(self.bins);
        let max_count = histogram.max_count();
        let bars: Vec<HistogramBar> = histogram
            .bins
            .iter()
            .map(|bin| HistogramBar {
                label: self.format.format(bin.label),
                count: bin.count,
                height_percent: if max_count > 0 {
                    bin.count as f64 / max_count as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        let range_start = bars.first().map(|b| b.label.clone()).unwrap_or_default();
        let range_end = bars.last().map(|b| b.label.clone()).unwrap_or_default();

        DisplayModel::Summary(SummaryView {
            count: summary.count,
            mean_price_per_area: self.format.format(summary.mean_price_per_area),
            median_price_per_area: self.format.format(summary.median_price_per_area),
            modal_price_per_area: summary
                .modal_price_per_area
                .map(|v| self.format.format(v))
                .unwrap_or_else(|| "N/A".to_string()),
            min_price: self.format.format(summary.min_price),
            max_price: self.format.format(summary.max_price),
            bars,
            range_start,
            range_end,
            calculator: summary
                .modal_price_per_area
                .map(|modal| UnitCalculator::new(modal, self.default_quantity, self.format.clone())),
        })
    }
}
