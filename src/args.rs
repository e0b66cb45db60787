use clap::{Parser, ValueEnum};
use listing_stats::SourceType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-stats")]
#[command(about = "Price-per-area statistics for real-estate listing pages")]
#[command(version)]
pub struct Args {
    /// Page to analyze (search results URL, or HTML file path with --type file)
    pub uri: String,

    /// Source type (web, file)
    #[arg(short, long, value_enum, default_value_t = SourceTypeArg::Web)]
    pub type_: SourceTypeArg,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of histogram bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Initial area for the unit price calculator
    #[arg(long)]
    pub area: Option<f64>,

    /// Interval between navigation checks in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Wait after a detected navigation before extracting, in milliseconds
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Directory to persist the session in (in-memory if omitted)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceTypeArg {
    Web,
    File,
}

/// Convert from CLI argument source type to internal source type
pub fn convert_source_type(arg_type: SourceTypeArg, uri: &str) -> SourceType {
    match arg_type {
        SourceTypeArg::Web => SourceType::Web(uri.to_string()),
        SourceTypeArg::File => SourceType::File(uri.to_string()),
    }
}
