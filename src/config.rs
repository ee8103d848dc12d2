// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Process configuration from environment variables

use std::env;

use crate::detection::capability::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::media::fetcher::MediaCredentials;

/// Default webhook port
pub const DEFAULT_PORT: u16 = 5000;

/// Default detection model location
pub const DEFAULT_MODEL_PATH: &str = "models/crop_pest_detection_yolo12n.onnx";

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the webhook server binds to
    pub port: u16,
    /// Path to the ONNX detection model
    pub model_path: String,
    /// Minimum confidence for reported detections
    pub confidence_threshold: f32,
    /// Twilio credentials for authenticated media download; `None` means
    /// media retrieval proceeds unauthenticated
    pub media_credentials: Option<MediaCredentials>,
}

impl AppConfig {
    /// Read configuration from the environment
    ///
    /// Environment variables:
    /// - `PORT` (default 5000)
    /// - `MODEL_PATH` (default models/crop_pest_detection_yolo12n.onnx)
    /// - `CONFIDENCE_THRESHOLD` (default 0.25)
    /// - `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` (optional, both
    ///   required for authenticated media download)
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());

        let confidence_threshold = env::var("CONFIDENCE_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<f32>().ok())
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);

        let media_credentials = credentials_from(
            env::var("TWILIO_ACCOUNT_SID").ok(),
            env::var("TWILIO_AUTH_TOKEN").ok(),
        );

        Self {
            port,
            model_path,
            confidence_threshold,
            media_credentials,
        }
    }
}

/// Build the credential pair; partial or empty credentials count as absent
fn credentials_from(
    account_sid: Option<String>,
    auth_token: Option<String>,
) -> Option<MediaCredentials> {
    match (account_sid, auth_token) {
        (Some(account_sid), Some(auth_token))
            if !account_sid.is_empty() && !auth_token.is_empty() =>
        {
            Some(MediaCredentials {
                account_sid,
                auth_token,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_parts() {
        assert!(credentials_from(Some("AC123".to_string()), None).is_none());
        assert!(credentials_from(None, Some("token".to_string())).is_none());
        assert!(credentials_from(None, None).is_none());
    }

    #[test]
    fn test_empty_credentials_count_as_absent() {
        assert!(credentials_from(Some(String::new()), Some("token".to_string())).is_none());
        assert!(credentials_from(Some("AC123".to_string()), Some(String::new())).is_none());
    }

    #[test]
    fn test_complete_credentials() {
        let credentials =
            credentials_from(Some("AC123".to_string()), Some("token".to_string())).unwrap();
        assert_eq!(credentials.account_sid, "AC123");
        assert_eq!(credentials.auth_token, "token");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_PORT, 5000);
        assert!(DEFAULT_MODEL_PATH.ends_with(".onnx"));
    }
}
