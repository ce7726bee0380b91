// src/services/metrics.rs
use crate::models::{DerivedRow, PriceBar};

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 50;

/// Compute the derived series: integer day offset since the first
/// observation plus trailing 20- and 50-day simple moving averages of
/// the close. Leading rows without a full window stay `None`; nothing
/// is forward-filled.
pub fn derive_metrics(bars: &[PriceBar]) -> Vec<DerivedRow> {
    let first_date = match bars.first() {
        Some(bar) => bar.date,
        None => return Vec::new(),
    };

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ma20 = rolling_mean(&closes, SHORT_WINDOW);
    let ma50 = rolling_mean(&closes, LONG_WINDOW);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| DerivedRow {
            date: bar.date,
            day_offset: (bar.date - first_date).num_days(),
            close: bar.close,
            ma20: ma20[i],
            ma50: ma50[i],
        })
        .collect()
}

/// Trailing simple moving average over `window` values.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn series(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| PriceBar {
                date: start + Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 1_000,
            })
            .collect()
    }

    #[test]
    fn day_offsets_start_at_zero_and_never_decrease() {
        let derived = derive_metrics(&series(30));
        assert_eq!(derived[0].day_offset, 0);
        assert!(derived.windows(2).all(|w| w[0].day_offset <= w[1].day_offset));
    }

    #[test]
    fn offsets_count_calendar_days_not_rows() {
        let mut bars = series(3);
        // weekend gap between rows 1 and 2
        bars[2].date = bars[1].date + Duration::days(3);

        let derived = derive_metrics(&bars);
        assert_eq!(derived[1].day_offset, 1);
        assert_eq!(derived[2].day_offset, 4);
    }

    #[test]
    fn moving_averages_defined_for_exactly_trailing_rows() {
        for n in [5usize, 19, 20, 49, 50, 120] {
            let derived = derive_metrics(&series(n));
            let ma20_count = derived.iter().filter(|r| r.ma20.is_some()).count();
            let ma50_count = derived.iter().filter(|r| r.ma50.is_some()).count();
            assert_eq!(ma20_count, n.saturating_sub(19), "ma20 for n={}", n);
            assert_eq!(ma50_count, n.saturating_sub(49), "ma50 for n={}", n);
        }
    }

    #[test]
    fn moving_average_values_are_trailing_means() {
        let derived = derive_metrics(&series(60));

        // closes are 100..=159, so the first full 20-window averages 100..=119
        assert_eq!(derived[19].ma20, Some(109.5));
        // trailing window ending at row 59 averages closes 140..=159
        assert_eq!(derived[59].ma20, Some(149.5));
        assert_eq!(derived[49].ma50, Some(124.5));
        assert_eq!(derived[18].ma20, None);
        assert_eq!(derived[48].ma50, None);
    }

    #[test]
    fn empty_series_derives_nothing() {
        assert!(derive_metrics(&[]).is_empty());
    }
}
