use anyhow::anyhow;
use chrono::{TimeZone, Utc};
use derive_more::Constructor;
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use std::str::FromStr;

/// Rate limit state GitHub reports in `x-ratelimit-*` response headers.
#[derive(Constructor, Debug, PartialEq)]
pub struct RateLimit {
    limit: u32,
    remaining: u32,
    reset: i64,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap<HeaderValue>) -> anyhow::Result<RateLimit> {
        Ok(RateLimit {
            limit: read_header::<u32>(headers, "x-ratelimit-limit")?,
            remaining: read_header::<u32>(headers, "x-ratelimit-remaining")?,
            reset: read_header::<i64>(headers, "x-ratelimit-reset")?,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Seconds until the window resets, zero if already past.
    pub fn reset_in(&self, now: i64) -> u64 {
        std::cmp::max(self.reset - now, 0) as u64
    }
}

/// Logs rate limit headers of a failed upstream response.
pub(crate) fn log_rate_limit(headers: &HeaderMap<HeaderValue>) {
    let rate_limit = match RateLimit::from_headers(headers) {
        Ok(rate_limit) => rate_limit,
        Err(err) => {
            debug!("No rate limit info: {}", err);
            return;
        }
    };
    if rate_limit.is_exhausted() {
        let reset_at = Utc
            .timestamp_opt(rate_limit.reset, 0)
            .single()
            .map(|reset| reset.to_rfc3339())
            .unwrap_or_else(|| rate_limit.reset.to_string());
        warn!(
            "GitHub API rate limit of {} requests exhausted, resets at {} (in {} sec)",
            rate_limit.limit,
            reset_at,
            rate_limit.reset_in(Utc::now().timestamp())
        );
    } else {
        debug!("Rate limit: {:?}", rate_limit);
    }
}

fn read_header<T>(headers: &HeaderMap<HeaderValue>, header: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let header = headers
        .get(header)
        .ok_or_else(|| anyhow!("Header {} not found", header))?
        .to_str()?;
    Ok(header.parse::<T>()?)
}

#[test]
fn from_headers_test() -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_str("60")?);
    headers.insert("x-ratelimit-remaining", HeaderValue::from_str("0")?);
    headers.insert("x-ratelimit-reset", HeaderValue::from_str("1700000000")?);
    let rate_limit = RateLimit::from_headers(&headers)?;
    assert_eq!(rate_limit, RateLimit::new(60, 0, 1700000000));
    assert!(rate_limit.is_exhausted());
    assert_eq!(rate_limit.reset_in(1699999990), 10);
    assert_eq!(rate_limit.reset_in(1700000010), 0, "Past reset should not underflow");
    Ok(())
}

#[test]
fn missing_header_test() -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_str("60")?);
    assert!(RateLimit::from_headers(&headers).is_err());
    Ok(())
}

#[test]
fn invalid_header_test() -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_str("sixty")?);
    headers.insert("x-ratelimit-remaining", HeaderValue::from_str("0")?);
    headers.insert("x-ratelimit-reset", HeaderValue::from_str("1700000000")?);
    assert!(RateLimit::from_headers(&headers).is_err());
    Ok(())
}
