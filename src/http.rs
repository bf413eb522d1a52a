use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Blocking text GET. The only network seam in the crate.
pub trait TextFetcher {
    fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: TextFetcher + ?Sized> TextFetcher for &T {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).get_text(url)
    }
}

pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skydash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl TextFetcher for HttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}
