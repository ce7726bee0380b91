//src/services/yahoo.rs
use chrono::{DateTime, Duration, NaiveDate};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error as StdError;

use super::normalize::{ColumnLabel, RawColumn, RawFrame};

pub type Result<T> = std::result::Result<T, Box<dyn StdError + Send + Sync>>;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Fetch daily OHLCV bars for a ticker from the Yahoo v8 chart API.
///
/// An unknown ticker or a range with no trading days yields an empty
/// frame, not an error; callers treat that as the "no data" signal.
/// `end` is inclusive, so the request covers through end-of-day.
pub async fn fetch_daily_history(
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RawFrame> {
    let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
    let period2 = (end + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp();

    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{ticker}\
?period1={period1}&period2={period2}&interval=1d&includePrePost=false",
    );
    info!("Fetching daily history from URL: {}", url);

    // Yahoo rejects the default reqwest user agent
    let client = Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()?;

    let body = client.get(&url).send().await?.text().await?;
    let response: ChartResponse = serde_json::from_str(&body)?;

    build_frame(ticker, response)
}

/// Shape the decoded chart payload into a raw frame. Columns keep the
/// upstream compound labeling (field name plus ticker sublevel); the
/// normalizer collapses that later.
fn build_frame(ticker: &str, response: ChartResponse) -> Result<RawFrame> {
    if let Some(err) = response.chart.error {
        // "Not Found" etc. means an unknown symbol, which is an
        // expected outcome rather than a fault
        warn!(
            "Chart API returned no data for {}: {} ({})",
            ticker, err.code, err.description
        );
        return Ok(RawFrame::default());
    }

    let result = match response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
    {
        Some(result) => result,
        None => {
            warn!("Chart API returned an empty result set for {}", ticker);
            return Ok(RawFrame::default());
        }
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(RawFrame::default()),
    };

    let symbol = result.meta.symbol;
    let mut dates = Vec::with_capacity(result.timestamp.len());
    let mut open = Vec::with_capacity(result.timestamp.len());
    let mut high = Vec::with_capacity(result.timestamp.len());
    let mut low = Vec::with_capacity(result.timestamp.len());
    let mut close = Vec::with_capacity(result.timestamp.len());
    let mut volume = Vec::with_capacity(result.timestamp.len());

    for (i, ts) in result.timestamp.iter().enumerate() {
        let date = DateTime::from_timestamp(*ts, 0)
            .ok_or("Invalid timestamp in chart response")?
            .date_naive();

        // Yahoo pads halted days with nulls; skip incomplete rows
        let row = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        if let (Some(o), Some(h), Some(l), Some(c), Some(v)) = row {
            dates.push(date);
            open.push(o);
            high.push(h);
            low.push(l);
            close.push(c);
            volume.push(v as f64);
        }
    }

    let columns = vec![
        raw_column("Open", &symbol, open),
        raw_column("High", &symbol, high),
        raw_column("Low", &symbol, low),
        raw_column("Close", &symbol, close),
        raw_column("Volume", &symbol, volume),
    ];

    Ok(RawFrame { dates, columns })
}

fn raw_column(field: &str, symbol: &str, values: Vec<f64>) -> RawColumn {
    RawColumn {
        label: ColumnLabel {
            field: field.to_string(),
            sublevel: Some(symbol.to_string()),
        },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL"},
                "timestamp": [1672756200, 1672842600, 1672929000],
                "indicators": {
                    "quote": [{
                        "open": [130.28, 126.89, null],
                        "high": [130.9, 128.66, 127.77],
                        "low": [124.17, 125.08, 124.76],
                        "close": [125.07, 126.36, 125.02],
                        "volume": [112117500, 89113600, 80962700]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND_BODY: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[test]
    fn decodes_chart_payload_into_compound_columns() {
        let response: ChartResponse = serde_json::from_str(CHART_BODY).unwrap();
        let frame = build_frame("AAPL", response).unwrap();

        // third row has a null open and is dropped
        assert_eq!(frame.dates.len(), 2);
        assert_eq!(frame.columns.len(), 5);
        assert_eq!(frame.columns[0].label.field, "Open");
        assert_eq!(frame.columns[0].label.sublevel.as_deref(), Some("AAPL"));
        assert_eq!(frame.columns[3].label.field, "Close");
        assert_eq!(frame.columns[3].values, vec![125.07, 126.36]);
    }

    #[test]
    fn unknown_symbol_yields_empty_frame_not_error() {
        let response: ChartResponse = serde_json::from_str(NOT_FOUND_BODY).unwrap();
        let frame = build_frame("NOSUCH", response).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn empty_result_set_yields_empty_frame() {
        let response: ChartResponse =
            serde_json::from_str(r#"{"chart": {"result": [], "error": null}}"#).unwrap();
        let frame = build_frame("AAPL", response).unwrap();
        assert!(frame.is_empty());
    }
}
