// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inbound webhook request types

use serde::Deserialize;

use crate::dispatch::InboundTurn;

/// Twilio message webhook form payload
///
/// Twilio posts `application/x-www-form-urlencoded` with PascalCase field
/// names. Only the first media item is considered; every field defaults so
/// a sparse payload still deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TwilioWebhookRequest {
    /// Free-text message body
    #[serde(rename = "Body", default)]
    pub body: String,

    /// Sender identifier (e.g. `whatsapp:+15551234567`)
    #[serde(rename = "From", default)]
    pub from: String,

    /// Number of attached media items; Twilio sends this as a string
    #[serde(rename = "NumMedia", default)]
    pub num_media: String,

    /// URL of the first media item
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: Option<String>,

    /// Declared content type of the first media item
    #[serde(rename = "MediaContentType0", default)]
    pub media_content_type: Option<String>,
}

impl TwilioWebhookRequest {
    /// Parsed media count; malformed or missing values count as zero
    pub fn num_media(&self) -> u32 {
        self.num_media.trim().parse().unwrap_or(0)
    }

    /// Reduce the webhook payload to the fields the pipeline needs
    pub fn into_turn(self) -> InboundTurn {
        let num_media = self.num_media();
        InboundTurn {
            body: self.body.trim().to_string(),
            from: self.from,
            num_media,
            media_url: self.media_url,
            media_content_type: self.media_content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_renames() {
        let request: TwilioWebhookRequest = serde_json::from_value(json!({
            "Body": "hi",
            "From": "whatsapp:+15551234567",
            "NumMedia": "1",
            "MediaUrl0": "https://api.twilio.com/media/0",
            "MediaContentType0": "image/jpeg",
        }))
        .unwrap();

        assert_eq!(request.body, "hi");
        assert_eq!(request.from, "whatsapp:+15551234567");
        assert_eq!(request.num_media(), 1);
        assert_eq!(
            request.media_content_type.as_deref(),
            Some("image/jpeg")
        );
    }

    #[test]
    fn test_sparse_payload_defaults() {
        let request: TwilioWebhookRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.body, "");
        assert_eq!(request.num_media(), 0);
        assert!(request.media_url.is_none());
    }

    #[test]
    fn test_malformed_num_media_counts_as_zero() {
        let request = TwilioWebhookRequest {
            num_media: "many".to_string(),
            ..Default::default()
        };
        assert_eq!(request.num_media(), 0);
    }

    #[test]
    fn test_into_turn_trims_body() {
        let request = TwilioWebhookRequest {
            body: "  hello  ".to_string(),
            from: "whatsapp:+15551234567".to_string(),
            num_media: "0".to_string(),
            ..Default::default()
        };

        let turn = request.into_turn();
        assert_eq!(turn.body, "hello");
        assert_eq!(turn.num_media, 0);
    }

    #[test]
    fn test_into_turn_carries_media_fields() {
        let request = TwilioWebhookRequest {
            num_media: "2".to_string(),
            media_url: Some("https://api.twilio.com/media/0".to_string()),
            media_content_type: Some("image/png".to_string()),
            ..Default::default()
        };

        let turn = request.into_turn();
        assert_eq!(turn.num_media, 2);
        assert_eq!(
            turn.media_url.as_deref(),
            Some("https://api.twilio.com/media/0")
        );
        assert_eq!(turn.media_content_type.as_deref(), Some("image/png"));
    }
}
