use crate::results::ListingRecord;
use serde::Serialize;

/// Default number of histogram bins
pub const DEFAULT_BINS: usize = 10;

/// Descriptive statistics over a record collection, recomputed in full on every change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub mean_price_per_area: f64,
    pub median_price_per_area: f64,
    /// Mean of the values in the most populated histogram bin
    pub modal_price_per_area: Option<f64>,
    pub min_price: f64,
    pub max_price: f64,
    /// Every price per area, ascending
    pub sorted_prices_per_area: Vec<f64>,
}

impl StatisticsSummary {
    /// Histogram of the summarized prices per area, built fresh on each call
    pub fn histogram(&self, bins: usize) -> Histogram {
        Histogram::build(&self.sorted_prices_per_area, bins)
    }
}

/// One histogram bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Rounded lower bound of the bin
    pub label: f64,
    pub count: usize,
    #[serde(skip)]
    values: Vec<f64>,
}

impl HistogramBin {
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Fixed-bin-count histogram spanning `[min, max]` linearly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin `values` into `bin_count` equal-width bins. A value equal to the
    /// maximum lands in the last bin; when every value is equal they all land
    /// in the first bin.
    pub fn build(values: &[f64], bin_count: usize) -> Self {
        if values.is_empty() || bin_count == 0 {
            return Self { bins: Vec::new() };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / bin_count as f64;

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                label: (min + i as f64 * width).round(),
                count: 0,
                values: Vec::new(),
            })
            .collect();

        for &value in values {
            let index = if width > 0.0 {
                (((value - min) / width).floor() as usize).min(bin_count - 1)
            } else {
                0
            };
            bins[index].count += 1;
            bins[index].values.push(value);
        }

        Self { bins }
    }

    /// Largest bin count in this histogram
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Index of the most populated bin; the first one wins ties
    pub fn modal_bin(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, bin) in self.bins.iter().enumerate() {
            if bin.count == 0 {
                continue;
            }
            match best {
                Some((_, count)) if bin.count <= count => {}
                _ => best = Some((i, bin.count)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Mean of the raw values in the most populated bin
    pub fn modal_value(&self) -> Option<f64> {
        let bin = &self.bins[self.modal_bin()?];
        Some(mean(&bin.values))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summarize a record collection. Returns `None` only for an empty collection.
pub fn summarize(records: &[ListingRecord], bins: usize) -> Option<StatisticsSummary> {
    if records.is_empty() {
        return None;
    }

    let mut prices_per_area: Vec<f64> = records.iter().map(|r| r.price_per_area()).collect();
    prices_per_area.sort_by(|a, b| a.total_cmp(b));

    let count = prices_per_area.len();
    let median = if count % 2 == 0 {
        (prices_per_area[count / 2 - 1] + prices_per_area[count / 2]) / 2.0
    } else {
        prices_per_area[count / 2]
    };

    let min_price = records.iter().map(|r| r.price()).fold(f64::INFINITY, f64::min);
    let max_price = records
        .iter()
        .map(|r| r.price())
        .fold(f64::NEG_INFINITY, f64::max);

    let modal = Histogram::build(&prices_per_area, bins).modal_value();

    Some(StatisticsSummary {
        count: records.len(),
        mean_price_per_area: mean(&prices_per_area),
        median_price_per_area: median,
        modal_price_per_area: modal,
        min_price,
        max_price,
        sorted_prices_per_area: prices_per_area,
    })
}
