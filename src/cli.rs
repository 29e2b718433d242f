use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(bin_name = env!("CARGO_PKG_NAME"), version = env!("CARGO_PKG_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the configuration file
    #[clap(name = "config")]
    pub config: PathBuf,

    /// Dataset keys whose thumbnails should be prefetched
    #[clap(short, long = "dataset")]
    pub datasets: Vec<String>,

    /// Year of the calendar to render (defaults to the current year)
    #[clap(long)]
    pub year: Option<i32>,

    /// Zero-based month of the calendar to render (0 = January)
    #[clap(long)]
    pub month: Option<u32>,

    /// Date to highlight as selected (YYYY-MM-DD)
    #[clap(long)]
    pub selected: Option<String>,
}
