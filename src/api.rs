// API client module: a small blocking HTTP client for the APOD endpoint.
// Each fetch is exactly one GET; the body is read into a growable buffer
// capped at `max_response_bytes`.

use crate::apod::Apod;
use crate::config::Config;
use crate::date::ApodDate;
use crate::error::{Error, Result};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use std::io::Read;
use tracing::debug;

/// NASA issues keys of exactly this length.
pub const API_KEY_LEN: usize = 40;
/// Largest `count` the service accepts for random fetches.
pub const MAX_RANDOM_COUNT: u32 = 100;

/// The three ways of asking the service for entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Date(ApodDate),
    Count(u32),
    /// Sent as-is; the service decides what an inverted range means.
    Range { start: ApodDate, end: ApodDate },
}

/// Blocking client bound to one base URL and one validated API key.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    max_response_bytes: usize,
}

/// Reject keys that are absent or not `API_KEY_LEN` characters long.
pub fn validate_api_key(key: Option<&str>) -> Result<&str> {
    let key = key.ok_or(Error::MissingApiKey)?;
    let actual = key.chars().count();
    if actual != API_KEY_LEN {
        return Err(Error::InvalidApiKey {
            expected: API_KEY_LEN,
            actual,
        });
    }
    Ok(key)
}

/// Parse a `fetch-random` count, accepting 1 through `MAX_RANDOM_COUNT`.
pub fn parse_count(raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_RANDOM_COUNT).contains(n))
        .ok_or_else(|| Error::InvalidNumber(raw.to_string()))
}

impl ApiClient {
    /// Create a client from the configuration. Fails before anything else
    /// happens if the key is missing or malformed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = validate_api_key(config.api_key.as_deref())?.to_string();
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| Error::Config(format!("invalid API URL '{}': {e}", config.api_url)))?;
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url,
            api_key,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Full request URL for `query`, including the API key.
    pub fn request_url(&self, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            match query {
                Query::Date(date) => {
                    pairs.append_pair("date", &date.to_string());
                }
                Query::Count(count) => {
                    pairs.append_pair("count", &count.to_string());
                }
                Query::Range { start, end } => {
                    pairs.append_pair("start_date", &start.to_string());
                    pairs.append_pair("end_date", &end.to_string());
                }
            }
        }
        url
    }

    /// Fetch the entry for a single date.
    pub fn fetch_single(&self, date: ApodDate) -> Result<Apod> {
        let body = self.get(&Query::Date(date))?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch `count` random entries.
    pub fn fetch_random(&self, count: u32) -> Result<Vec<Apod>> {
        if !(1..=MAX_RANDOM_COUNT).contains(&count) {
            return Err(Error::InvalidNumber(count.to_string()));
        }
        let body = self.get(&Query::Count(count))?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch every entry from `start` to `end`, inclusive.
    pub fn fetch_range(&self, start: ApodDate, end: ApodDate) -> Result<Vec<Apod>> {
        let body = self.get(&Query::Range { start, end })?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn get(&self, query: &Query) -> Result<Vec<u8>> {
        let url = self.request_url(query);
        debug!(target: "apod::api", "→ GET {}", redact(&url));

        let res = self.client.get(url).send()?;
        let status = res.status();
        debug!(target: "apod::api", "← {}", status);

        if !status.is_success() {
            let headers = res.headers().clone();
            let (body, _) = read_capped(res, self.max_response_bytes)?;
            return Err(Error::Fetch {
                status,
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let limit = self.max_response_bytes;
        if res.content_length().is_some_and(|len| len > limit as u64) {
            return Err(Error::ResponseTooLarge { limit });
        }
        let (body, overflowed) = read_capped(res, limit)?;
        if overflowed {
            return Err(Error::ResponseTooLarge { limit });
        }
        debug!(target: "apod::api", "response body: {} bytes", body.len());
        Ok(body)
    }
}

/// Read at most `limit` bytes; the flag reports whether more were pending.
fn read_capped(res: Response, limit: usize) -> Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    res.take((limit as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(Error::ReadBody)?;
    let overflowed = buf.len() > limit;
    buf.truncate(limit);
    Ok((buf, overflowed))
}

/// URL with the `api_key` value masked, for logging.
pub fn redact(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "[REDACTED]".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
