// DigitalOcean metadata HTTP client
//
// Wraps `reqwest::Client` with metadata-service URL construction and
// status handling. The service is a link-local unauthenticated endpoint,
// so there is no auth plumbing -- just short timeouts and strict status
// checks. Endpoint modules stay focused on normalization; this module owns
// transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::DatasourceError;

/// Raw HTTP client for the droplet metadata service.
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MetadataClient {
    /// Create a client against `base_url` (normally
    /// `http://169.254.169.254/`) with a per-request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, DatasourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The metadata service root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL for a metadata path, e.g. `metadata/v1.json`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, DatasourceError> {
        Ok(self.base_url.join(path)?)
    }

    /// `true` when the service root answers at all -- any HTTP status
    /// counts, only transport failure means "not here".
    pub(crate) async fn probe(&self, path: &str) -> bool {
        let Ok(url) = self.url(path) else {
            return false;
        };
        debug!("probing {}", url);
        self.http.get(url).send().await.is_ok()
    }

    /// GET a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DatasourceError> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DatasourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| DatasourceError::Decode {
            message: e.to_string(),
        })
    }

    /// GET a plain-text document. A 404 yields `None`: several metadata
    /// paths (user-data most prominently) simply don't exist when the
    /// operator configured nothing.
    pub(crate) async fn get_text(&self, path: &str) -> Result<Option<String>, DatasourceError> {
        let url = self.url(path)?;
        debug!("GET {}", url);
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DatasourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(Some(resp.text().await?))
    }
}
