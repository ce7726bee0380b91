use chrono::{Duration, Utc};
use dotenv::dotenv;
use env_logger;
use log::{error, info};
use stock_dashboard::services::{metrics, normalize, yahoo};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let ticker = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let end = Utc::now().date_naive();
    let start = end - Duration::days(180);

    info!(
        "Testing Yahoo chart fetch for {} ({} to {})...",
        ticker, start, end
    );

    let mut frame = match yahoo::fetch_daily_history(&ticker, start, end).await {
        Ok(frame) => frame,
        Err(e) => {
            error!("ERROR: Failed to fetch daily history: {}", e);
            return Err(e.into());
        }
    };

    if frame.is_empty() {
        error!("No data found for {}", ticker);
        return Ok(());
    }

    normalize::normalize_columns(&mut frame);
    let bars = normalize::to_price_bars(&frame)?;
    info!("SUCCESS: fetched {} daily bars for {}", bars.len(), ticker);

    for bar in bars.iter().take(5) {
        println!(
            "{}  O {:.2}  H {:.2}  L {:.2}  C {:.2}  V {}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }

    let derived = metrics::derive_metrics(&bars);
    if let Some(last) = derived.last() {
        println!(
            "last row: offset {}  close {:.2}  ma20 {:?}  ma50 {:?}",
            last.day_offset, last.close, last.ma20, last.ma50
        );
    }

    Ok(())
}
