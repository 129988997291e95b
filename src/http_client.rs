use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::telemetry::{EventSink, FetchEvent};

static CLIENT: OnceCell<Client> = OnceCell::new();

/// The first caller decides the timeout; later calls reuse the same client.
pub fn http_client_with_timeout(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build http client")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// Only 200 carries a payload; 204 and other 2xx codes count as failures.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Synchronous GET returning the raw status and body.
///
/// A non-success status is a normal response; `Err` is reserved for transport
/// failures (DNS, timeout, unreadable body).
pub trait JsonSource {
    fn get(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpJsonSource {
    client: &'static Client,
}

impl HttpJsonSource {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http_client_with_timeout(timeout_secs)?,
        })
    }
}

impl JsonSource for HttpJsonSource {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, "statsbomb_viewer/0.1")
            .send()
            .context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(FetchResponse { status, body })
    }
}

/// Issues the GET and reports any failure to `sink`. `None` means the caller
/// should degrade to an empty result and must not cache it.
pub fn get_or_report<S>(source: &S, sink: &mut dyn EventSink, url: &str) -> Option<FetchResponse>
where
    S: JsonSource + ?Sized,
{
    match source.get(url) {
        Ok(resp) if resp.is_success() && !resp.body.trim().is_empty() => Some(resp),
        Ok(resp) if resp.is_success() => {
            sink.record(FetchEvent::FetchFailure {
                url: url.to_string(),
                status: Some(resp.status),
                reason: "empty body".to_string(),
            });
            None
        }
        Ok(resp) => {
            sink.record(FetchEvent::FetchFailure {
                url: url.to_string(),
                status: Some(resp.status),
                reason: "non-success status".to_string(),
            });
            None
        }
        Err(err) => {
            sink.record(FetchEvent::FetchFailure {
                url: url.to_string(),
                status: None,
                reason: format!("{err:#}"),
            });
            None
        }
    }
}
