use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::TransportConfig;
use crate::error::{Error, Result};

use super::method::HttpMethod;
use super::request::RequestInput;
use super::response::HttpResponse;

/// Thin async transport over a shared `reqwest::Client`.
///
/// Every call is attempted exactly once.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let headers = build_headers(&config.headers)?;

        let mut builder = Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10));

        if config.timeout_ms > 0 {
            builder = builder.timeout(Duration::from_millis(config.timeout_ms));
        }

        let client = builder
            .build()
            .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(RequestInput::get(url)).await
    }

    pub async fn post(&self, url: &str, body: &str) -> Result<HttpResponse> {
        self.send(RequestInput::post(url, body)).await
    }

    pub async fn send(&self, request: RequestInput) -> Result<HttpResponse> {
        let url = parse_url(&request.url)?;
        let method: reqwest::Method = request.method.into();

        let mut req_builder = self.client.request(method, url);
        if let Some(body) = request.body {
            if matches!(request.method, HttpMethod::Post) {
                req_builder = req_builder
                    .header(CONTENT_TYPE, "application/json")
                    .body(body);
            }
        }

        let started = Instant::now();
        let response = req_builder.send().await?;
        let elapsed = started.elapsed().as_millis() as u64;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            elapsed_ms = elapsed,
            bytes = bytes.len(),
            "http exchange"
        );

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            body,
            duration_ms: elapsed,
            size_bytes: bytes.len() as u64,
        })
    }
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| Error::InvalidUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })
}

pub fn build_headers(input: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let header_name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|err| Error::Config(format!("Invalid header name `{key}`: {err}")))?;
        let header_value = HeaderValue::from_str(value.trim())
            .map_err(|err| Error::Config(format!("Invalid header value for `{key}`: {err}")))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut collected = HashMap::new();
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>");
        collected.insert(name.as_str().to_ascii_lowercase(), value.to_string());
    }
    collected
}
