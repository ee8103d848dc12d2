// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authenticated media retrieval
//!
//! Downloads message media over HTTP and decodes it into a canonical RGB
//! image. Twilio-hosted media requires HTTP Basic Auth with the account SID
//! and auth token, so the fetcher carries those credentials when configured.

use std::time::Duration;

use anyhow::Result;
use image::RgbImage;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::media::image_utils::{decode_rgb_image, ImageError};

/// Hard ceiling on a single media retrieval
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Optional Basic Auth pair for the media host
#[derive(Debug, Clone)]
pub struct MediaCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

/// Errors from media retrieval
///
/// Transport failures (`InvalidUrl`, `Request`, `Status`) and content
/// failures (`Image`) stay distinct so the caller can tell "could not
/// reach the media" apart from "the bytes were not an image".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid media URL: {0}")]
    InvalidUrl(String),

    #[error("media request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host returned status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Image(#[from] ImageError),
}

impl FetchError {
    /// True for network/transport failures, false for decode failures
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::Image(_))
    }
}

/// HTTP media fetcher with a bounded timeout
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    client: Client,
    credentials: Option<MediaCredentials>,
}

impl MediaFetcher {
    /// Create a fetcher, optionally carrying Basic Auth credentials
    pub fn new(credentials: Option<MediaCredentials>) -> Result<Self> {
        let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Download media from a URL and decode it into an RGB image
    ///
    /// No retry: a failure is terminal for the turn and the sender is
    /// prompted to resend instead.
    pub async fn fetch(&self, url: &str) -> Result<RgbImage, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let mut request = self.client.get(url);
        if let Some(ref credentials) = self.credentials {
            request = request.basic_auth(&credentials.account_sid, Some(&credentials.auth_token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await?;
        let (image, info) = decode_rgb_image(&bytes)?;

        debug!(
            "fetched media: {}x{}, {} bytes, {:?}",
            info.width, info.height, info.size_bytes, info.format
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_without_credentials() {
        let fetcher = MediaFetcher::new(None).unwrap();
        assert!(fetcher.credentials.is_none());
    }

    #[test]
    fn test_fetcher_with_credentials() {
        let fetcher = MediaFetcher::new(Some(MediaCredentials {
            account_sid: "AC123".to_string(),
            auth_token: "secret".to_string(),
        }))
        .unwrap();
        assert_eq!(fetcher.credentials.as_ref().unwrap().account_sid, "AC123");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = MediaFetcher::new(None).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result.unwrap_err(), FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let fetcher = MediaFetcher::new(None).unwrap();
        let result = fetcher.fetch("").await;
        assert!(matches!(result.unwrap_err(), FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let fetcher = MediaFetcher::new(None).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:59999/media/0").await;
        assert!(matches!(result.unwrap_err(), FetchError::Request(_)));
    }

    #[test]
    fn test_transport_vs_content_distinction() {
        assert!(FetchError::Status(StatusCode::NOT_FOUND).is_transport());
        assert!(FetchError::InvalidUrl("empty".to_string()).is_transport());
        assert!(!FetchError::Image(ImageError::EmptyData).is_transport());
    }
}
