#![warn(
    clippy::all,
    // clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    // clippy::unwrap_used
)]
use std::time::Duration;

use chrono::Datelike as _;
use clap::Parser;

use calendar::DayRecord;
use thumbnail::{HttpLoader, ThumbnailCache};
use uploads::UploadRecord;

pub mod calendar;
mod cli;
pub mod config;
pub mod thumbnail;
pub mod uploads;

#[tokio::main]
async fn main() {
    env_logger::builder().init();

    let cli = cli::Cli::parse();
    let config = config::init(cli.config).expect("Could not load the configuration file");

    let today = chrono::Local::now().date_naive();
    let year = cli.year.unwrap_or_else(|| today.year());
    let month0 = cli.month.unwrap_or_else(|| today.month0());

    let cache = ThumbnailCache::with_limits(
        HttpLoader::new(),
        config.api.url.clone(),
        config.thumbnails.max_concurrent,
        Duration::from_secs(config.thumbnails.max_age_secs),
    );
    let _sweeper = cache.spawn_sweeper();

    if !cli.datasets.is_empty() {
        log::info!("prefetching {} dataset thumbnails", cli.datasets.len());
        cache.preload_batch(&cli.datasets).await;

        for key in &cli.datasets {
            match cache.cached_url(key) {
                Some(url) => println!("{key}: {url}"),
                None => println!("{key}: unavailable"),
            }
        }
    }

    let agent = ureq::Agent::new();
    let records = match uploads::fetch_month(&agent, &config.api.url, year, month0) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Could not fetch uploads: {e:?}");

            if config.calendar.sample_fallback {
                uploads::sample_month(year, month0)
            } else {
                Vec::new()
            }
        }
    };

    render_month(year, month0, &records, cli.selected.as_deref());
}

fn render_month(year: i32, month0: u32, records: &[DayRecord<UploadRecord>], selected: Option<&str>) {
    let weeks = calendar::generate_weeks(year, month0, records, selected);
    let name = calendar::month_name(month0).unwrap_or("?");

    println!("{name} {year} ({} uploads)", calendar::total_item_count(records));
    println!(
        "{}",
        calendar::WEEKDAY_NAMES.map(|day| format!("{day:>7}")).join(" ")
    );

    for week in &weeks {
        let row = week
            .iter()
            .map(|day| {
                if !day.is_current_month {
                    format!("{:>7}", "")
                } else {
                    let marker = if day.is_today {
                        "*"
                    } else if day.is_selected {
                        ">"
                    } else {
                        ""
                    };

                    if day.item_count > 0 {
                        format!("{:>7}", format!("{marker}{} ({})", day.day, day.item_count))
                    } else {
                        format!("{:>7}", format!("{marker}{}", day.day))
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        println!("{row}");
    }
}
