use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::paper::FetchedPaper;
use crate::provider::atom::parse_feed;
use crate::provider::{PaperProvider, ProviderError, ProviderResult};
use crate::query::SearchRequest;

/// Blocking client for the arXiv export API.
///
/// Pages through results until the request's cap is reached or a short
/// page comes back, waiting `page_delay_ms` between pages. Transient
/// failures are retried with exponential backoff.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: Client,
    config: ProviderConfig,
}

impl ArxivClient {
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn fetch_page(&self, request: &SearchRequest, start: usize, size: usize) -> ProviderResult<Vec<FetchedPaper>> {
        with_retries(
            self.config.max_retries,
            self.config.retry_base_delay_ms,
            || self.fetch_page_once(request, start, size),
            thread::sleep,
        )
    }

    fn fetch_page_once(&self, request: &SearchRequest, start: usize, size: usize) -> ProviderResult<Vec<FetchedPaper>> {
        debug!(query = request.provider_query(), start, size, "arXiv page request");
        let resp = self
            .http
            .get(&self.config.base_url)
            .query(&[("search_query", request.provider_query())])
            .query(&[("start", start), ("max_results", size)])
            .query(&[
                ("sortBy", request.sort_key().as_api_str()),
                ("sortOrder", request.sort_direction().as_api_str()),
            ])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8")
            .send()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        let ctype = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.text().map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            // arXiv reports bad queries as an Atom error entry with HTTP 400.
            if let Err(api @ ProviderError::Api(_)) = parse_feed(&body) {
                return Err(api);
            }
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }
        if !(ctype.contains("xml") || ctype.contains("atom")) {
            return Err(ProviderError::Parse(format!(
                "unexpected content-type {ctype}: {}",
                preview(&body)
            )));
        }

        parse_feed(&body)
    }
}

impl PaperProvider for ArxivClient {
    fn fetch(&self, request: &SearchRequest) -> ProviderResult<Vec<FetchedPaper>> {
        let page_delay = Duration::from_millis(self.config.page_delay_ms);
        collect_pages(request.max_results(), self.config.page_size, |start, size| {
            if start > 0 && !page_delay.is_zero() {
                thread::sleep(page_delay);
            }
            self.fetch_page(request, start, size)
        })
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

/// Delay before retry number `attempt + 1`: `base_ms * 2^attempt`, with
/// the exponent capped at 6.
pub fn backoff(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.min(6);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Run `op`, retrying transient failures up to `max_retries` times and
/// calling `sleep` with the backoff delay before each retry.
pub fn with_retries<T>(
    max_retries: u32,
    base_ms: u64,
    mut op: impl FnMut() -> ProviderResult<T>,
    mut sleep: impl FnMut(Duration),
) -> ProviderResult<T> {
    let mut attempt: u32 = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_retries => {
                let delay = backoff(base_ms, attempt);
                warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, error = %e, "retrying arXiv request");
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Request pages of at most `page_size` until `cap` records are collected
/// or a page comes back shorter than asked. `fetch_page` gets the offset
/// and size of each page.
pub fn collect_pages(
    cap: usize,
    page_size: usize,
    mut fetch_page: impl FnMut(usize, usize) -> ProviderResult<Vec<FetchedPaper>>,
) -> ProviderResult<Vec<FetchedPaper>> {
    let page_size = page_size.max(1);
    let mut collected: Vec<FetchedPaper> = Vec::new();
    let mut start = 0;

    while collected.len() < cap {
        let size = (cap - collected.len()).min(page_size);
        let page = fetch_page(start, size)?;
        let short = page.len() < size;
        collected.extend(page);
        if short {
            break;
        }
        start += size;
    }

    collected.truncate(cap);
    Ok(collected)
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperId;
    use chrono::NaiveDate;

    fn papers(start: usize, n: usize) -> Vec<FetchedPaper> {
        (start..start + n)
            .map(|i| FetchedPaper {
                id: PaperId::new(format!("2401.{i:05}v1")),
                title: format!("Paper {i}"),
                authors: vec!["A".into()],
                summary: String::new(),
                pdf_url: String::new(),
                published: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                updated: None,
                categories: Vec::new(),
                primary_category: "cs.LG".into(),
                entry_id: String::new(),
            })
            .collect()
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(1_000, 0), Duration::from_millis(1_000));
        assert_eq!(backoff(1_000, 1), Duration::from_millis(2_000));
        assert_eq!(backoff(1_000, 3), Duration::from_millis(8_000));
        assert_eq!(backoff(1_000, 6), Duration::from_millis(64_000));
        assert_eq!(backoff(1_000, 40), Duration::from_millis(64_000));
        assert_eq!(backoff(u64::MAX, 2), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn transient_failures_are_retried_until_success() {
        let mut calls = 0;
        let mut slept = Vec::new();
        let result = with_retries(
            3,
            100,
            || {
                calls += 1;
                match calls {
                    1 => Err(ProviderError::Network("reset".into())),
                    2 => Err(ProviderError::Status { status: 503, body: String::new() }),
                    _ => Ok(calls),
                }
            },
            |d| slept.push(d),
        );

        assert_eq!(result.unwrap(), 3);
        assert_eq!(slept, vec![Duration::from_millis(100), Duration::from_millis(200)]);
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        let mut calls = 0;
        let mut slept = 0;
        let result: ProviderResult<()> = with_retries(
            5,
            100,
            || {
                calls += 1;
                Err(ProviderError::Api("bad query".into()))
            },
            |_| slept += 1,
        );

        assert!(matches!(result, Err(ProviderError::Api(_))));
        assert_eq!(calls, 1);
        assert_eq!(slept, 0);
    }

    #[test]
    fn retries_give_up_after_the_limit() {
        let mut calls = 0;
        let result: ProviderResult<()> = with_retries(
            2,
            10,
            || {
                calls += 1;
                Err(ProviderError::Status { status: 429, body: "slow down".into() })
            },
            |_| {},
        );

        assert!(matches!(result, Err(ProviderError::Status { status: 429, .. })));
        assert_eq!(calls, 3);
    }

    #[test]
    fn pages_until_the_cap() {
        let mut requested = Vec::new();
        let collected = collect_pages(250, 100, |start, size| {
            requested.push((start, size));
            Ok(papers(start, size))
        })
        .unwrap();

        assert_eq!(requested, vec![(0, 100), (100, 100), (200, 50)]);
        assert_eq!(collected.len(), 250);
        assert_eq!(collected[249].id, PaperId::new("2401.00249v1"));
    }

    #[test]
    fn short_page_stops_paging() {
        let mut requested = Vec::new();
        let collected = collect_pages(500, 100, |start, size| {
            requested.push((start, size));
            Ok(papers(start, if start == 100 { 30 } else { size }))
        })
        .unwrap();

        assert_eq!(requested, vec![(0, 100), (100, 100)]);
        assert_eq!(collected.len(), 130);
    }

    #[test]
    fn oversized_page_is_truncated_and_errors_propagate() {
        let collected = collect_pages(5, 0, |start, _| Ok(papers(start, 3))).unwrap();
        assert_eq!(collected.len(), 5);

        let failed = collect_pages(10, 5, |start, size| {
            if start == 0 {
                Ok(papers(start, size))
            } else {
                Err(ProviderError::Parse("truncated feed".into()))
            }
        });
        assert!(matches!(failed, Err(ProviderError::Parse(_))));
    }

    #[test]
    fn preview_cuts_long_bodies() {
        assert_eq!(preview("  short  "), "short");
        let long = "é".repeat(250);
        assert_eq!(preview(&long), format!("{}…", "é".repeat(200)));
    }
}
