use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT_ENCODING};
use std::io::Read;
use std::time::Instant;
use tracing::{debug, warn};

use super::{FetchError, FetchedPage, PageFetcher, ResponseHeaders};
use crate::config::FetchConfig;

/// Codings we ask for. Decoding happens here rather than in reqwest, because
/// reqwest drops `Content-Encoding` once it has decompressed a body and the
/// compression check needs to see it.
const ACCEPTED_ENCODINGS: &str = "gzip, br";

pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Network(error_chain(&err))
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn fetcher_name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header(ACCEPT_ENCODING, ACCEPTED_ENCODINGS)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let raw = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.config.timeout)
            } else {
                FetchError::Body(error_chain(&e))
            }
        })?;

        let decoded = decode_body(&raw, headers.get("content-encoding").map(String::as_str))?;
        let body_bytes = decoded.len();
        let body = String::from_utf8_lossy(&decoded).into_owned();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        debug!(
            "Fetched {} -> status {}, {} bytes on the wire, {} bytes decoded, {}ms",
            url,
            status,
            raw.len(),
            body_bytes,
            elapsed_ms
        );

        Ok(FetchedPage {
            body,
            body_bytes,
            status,
            headers,
            elapsed_ms,
        })
    }
}

fn collect_headers(map: &HeaderMap) -> ResponseHeaders {
    let mut headers = ResponseHeaders::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}

/// Undoes the content codings in reverse order of application.
fn decode_body(raw: &[u8], content_encoding: Option<&str>) -> Result<Vec<u8>, FetchError> {
    let Some(encoding) = content_encoding else {
        return Ok(raw.to_vec());
    };

    let mut data = raw.to_vec();
    for coding in encoding.split(',').rev() {
        let coding = coding.trim().to_ascii_lowercase();
        data = match coding.as_str() {
            "gzip" | "x-gzip" => read_all(flate2::read::GzDecoder::new(data.as_slice()), &coding)?,
            "deflate" => read_all(flate2::read::ZlibDecoder::new(data.as_slice()), &coding)?,
            "br" => read_all(brotli::Decompressor::new(data.as_slice(), 4096), &coding)?,
            "" | "identity" => data,
            other => {
                warn!("Unknown content coding '{}', keeping body as received", other);
                data
            }
        };
    }
    Ok(data)
}

fn read_all<R: Read>(mut reader: R, coding: &str) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Body(format!("{} decoding failed: {}", coding, e)))?;
    Ok(out)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
