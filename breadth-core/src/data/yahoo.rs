//! Yahoo Finance price provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API. Each call issues a single
//! request; rate limits and HTTP failures are reported to the caller.

use super::provider::{DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

/// Yahoo Finance price provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build the chart API URL for a ticker and date range.
    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{ticker}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    /// Parse the chart API response into a price series.
    ///
    /// Days with a missing close are dropped; a response with no closes at
    /// all is treated as an unknown ticker.
    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<PriceSeries, DataError> {
        let format_err = |msg: &str| DataError::ResponseFormatChanged(format!("{ticker}: {msg}"));

        let Some(results) = resp.chart.result else {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                    symbol: ticker.to_string(),
                },
                Some(err) => format_err(&format!("{} ({})", err.description, err.code)),
                None => format_err("chart has neither result nor error"),
            });
        };
        let Some(data) = results.into_iter().next() else {
            return Err(format_err("chart result is empty"));
        };
        let timestamps = data.timestamp.ok_or_else(|| format_err("missing timestamps"))?;
        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .ok_or_else(|| format_err("missing quote block"))?;
        if timestamps.len() != closes.len() {
            return Err(format_err(&format!(
                "{} timestamps but {} closes",
                timestamps.len(),
                closes.len()
            )));
        }

        let points = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| close.map(|c| (ts, c)))
            .map(|(ts, close)| {
                chrono::DateTime::from_timestamp(ts, 0)
                    .map(|dt| PricePoint::new(dt.date_naive(), close))
                    .ok_or_else(|| format_err(&format!("bad timestamp {ts}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let series = PriceSeries::from_points(points);
        if series.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        Ok(series)
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<FetchResult, DataError> {
        let url = Self::chart_url(ticker, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        match resp.status() {
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(DataError::RateLimited),
            reqwest::StatusCode::NOT_FOUND => {
                return Err(DataError::SymbolNotFound {
                    symbol: ticker.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(DataError::Http {
                    symbol: ticker.to_string(),
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let chart = resp
            .json::<ChartResponse>()
            .map_err(|e| DataError::ResponseFormatChanged(format!("{ticker}: {e}")))?;
        let series = Self::parse_response(ticker, chart)?;
        tracing::debug!(%ticker, closes = series.len(), "fetched chart");

        Ok(FetchResult {
            symbol: ticker.to_string(),
            series,
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PriceSeries, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("INFY.NS", resp)
    }

    #[test]
    fn parses_closes_and_drops_nulls() {
        // 2024-03-14, 2024-03-15, 2024-03-18 at 03:45 UTC
        let json = r#"{"chart":{"result":[{"timestamp":[1710387900,1710474300,1710733500],
            "indicators":{"quote":[{"close":[1600.5,null,1625.0]}]}}],"error":null}}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.close_on(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
            Some(1625.0)
        );
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(matches!(parse(json), Err(DataError::SymbolNotFound { .. })));
    }

    #[test]
    fn mismatched_array_lengths_are_rejected() {
        let json = r#"{"chart":{"result":[{"timestamp":[1710387900,1710474300],
            "indicators":{"quote":[{"close":[1600.5]}]}}],"error":null}}"#;
        assert!(matches!(parse(json), Err(DataError::ResponseFormatChanged(_))));
    }

    #[test]
    fn all_null_closes_is_not_found() {
        let json = r#"{"chart":{"result":[{"timestamp":[1710387900],
            "indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;
        assert!(matches!(parse(json), Err(DataError::SymbolNotFound { .. })));
    }

    #[test]
    fn chart_url_covers_end_date() {
        let url = YahooProvider::chart_url(
            "TCS.NS",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert!(url.contains("/chart/TCS.NS?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1706745600"));
        assert!(url.contains("interval=1d"));
    }
}
