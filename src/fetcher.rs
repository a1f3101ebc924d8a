//! An HTTP client that fetches flag snapshots from the server.
use std::sync::Arc;

use reqwest::{header, StatusCode, Url};

use crate::{config::CacheConfig, snapshot::Snapshot, Error, Result};

const SNAPSHOT_ENDPOINT: &str = "/client/snapshot";

/// Outcome of a conditional snapshot fetch.
#[derive(Debug)]
pub(crate) enum FetchOutcome {
    /// The server returned a new snapshot.
    Changed(Snapshot),
    /// The server confirmed the held version is still current (HTTP 304).
    Unchanged,
}

/// A client that fetches flag snapshots from the Flagpole server.
pub(crate) struct SnapshotFetcher {
    // Client holds a connection pool internally, so we're reusing the client
    // between requests.
    client: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl SnapshotFetcher {
    pub(crate) fn new(config: &CacheConfig) -> Result<SnapshotFetcher> {
        let endpoint = Url::parse(&format!("{}{}", config.base_url, SNAPSHOT_ENDPOINT))
            .map_err(Error::InvalidBaseUrl)?;

        Ok(SnapshotFetcher {
            client: reqwest::Client::new(),
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Issue one snapshot request, conditional on `prior_version` when
    /// present.
    pub(crate) async fn fetch(&self, prior_version: Option<u64>) -> Result<FetchOutcome> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(&self.token);
        if let Some(version) = prior_version {
            request = request.header(header::IF_NONE_MATCH, version.to_string());
        }

        log::debug!(target: "flagpole", prior_version:serde; "fetching flag snapshot");
        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_MODIFIED if prior_version.is_some() => {
                // Not-modified carries no body; skip parsing entirely.
                log::trace!(target: "flagpole", prior_version:serde; "snapshot unchanged");
                Ok(FetchOutcome::Unchanged)
            }
            status if status.is_success() => {
                let body = response.bytes().await?;
                let snapshot: Snapshot = serde_json::from_slice(&body)
                    .map_err(|err| Error::MalformedSnapshot(Arc::new(err)))?;
                log::debug!(target: "flagpole", version = snapshot.version; "fetched new snapshot");
                Ok(FetchOutcome::Changed(snapshot))
            }
            status => {
                // A 304 we never asked for lands here as well.
                log::warn!(target: "flagpole", status = status.as_u16(); "received non-success response while fetching snapshot");
                Err(Error::UnexpectedStatus(status))
            }
        }
    }
}
