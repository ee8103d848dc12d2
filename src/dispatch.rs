// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turn dispatch
//!
//! The orchestration entry point for one inbound message: classify the
//! turn, sequence fetch → detect → aggregate, and hand the outcome to the
//! reply composer. Every turn produces exactly one reply; no failure
//! escapes this boundary.

use std::sync::Arc;

use tracing::{error, info};

use crate::detection::aggregate::aggregate;
use crate::detection::capability::{DetectionError, DetectorInfo, ObjectDetector};
use crate::media::fetcher::MediaFetcher;
use crate::reply::composer::{compose, ReplyContext};

/// One webhook invocation, reduced to the fields the pipeline needs
#[derive(Debug, Clone, Default)]
pub struct InboundTurn {
    /// Free-text message body
    pub body: String,
    /// Sender identifier
    pub from: String,
    /// Number of attached media items
    pub num_media: u32,
    /// URL of the first media item, when present
    pub media_url: Option<String>,
    /// Declared content type of the first media item, when present
    pub media_content_type: Option<String>,
}

/// How a turn is routed, decided from media count and content type
enum TurnKind<'a> {
    Image(&'a str),
    NonImageMedia,
    NoMedia,
}

/// Per-process turn dispatcher
///
/// Holds the read-only detector handle (loaded once at startup, never
/// reloaded) and the media fetcher. Shared across concurrent turns via
/// Arc; turns are independent and need no cross-turn synchronization.
pub struct TurnDispatcher {
    detector: Option<Arc<dyn ObjectDetector>>,
    fetcher: MediaFetcher,
    confidence_threshold: f32,
}

impl TurnDispatcher {
    pub fn new(
        detector: Option<Arc<dyn ObjectDetector>>,
        fetcher: MediaFetcher,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            detector,
            fetcher,
            confidence_threshold,
        }
    }

    /// Whether a detection model is loaded
    pub fn model_loaded(&self) -> bool {
        self.detector.is_some()
    }

    /// Metadata of the loaded model, if any
    pub fn detector_info(&self) -> Option<DetectorInfo> {
        self.detector.as_ref().map(|detector| detector.info())
    }

    /// Handle one inbound turn and produce its reply
    pub async fn handle_turn(&self, turn: &InboundTurn) -> String {
        info!(
            from = %turn.from,
            num_media = turn.num_media,
            "received message: {}",
            turn.body
        );

        match self.classify(turn) {
            TurnKind::Image(url) => self.handle_image(url).await,
            TurnKind::NonImageMedia => compose(ReplyContext::NonImageMedia),
            TurnKind::NoMedia => compose(ReplyContext::NoMedia(turn.body.clone())),
        }
    }

    fn classify<'a>(&self, turn: &'a InboundTurn) -> TurnKind<'a> {
        if turn.num_media == 0 {
            return TurnKind::NoMedia;
        }

        let is_image = turn
            .media_content_type
            .as_deref()
            .map(|content_type| content_type.starts_with("image/"))
            .unwrap_or(false);

        if is_image {
            // A missing URL for a declared image falls through to the
            // fetcher, which reports it as a retrieval failure.
            TurnKind::Image(turn.media_url.as_deref().unwrap_or(""))
        } else {
            TurnKind::NonImageMedia
        }
    }

    async fn handle_image(&self, url: &str) -> String {
        // Availability gate before any network work
        let Some(detector) = self.detector.as_ref() else {
            info!("image turn received but no detection model is loaded");
            return compose(ReplyContext::ModelUnavailable);
        };

        let image = match self.fetcher.fetch(url).await {
            Ok(image) => image,
            Err(e) => {
                // Transport vs. decode stays distinguishable here even
                // though both render the same reply template.
                info!(transport = e.is_transport(), "media fetch failed: {}", e);
                return compose(ReplyContext::FetchFailure);
            }
        };

        self.run_detection(detector.as_ref(), &image).await
    }

    /// Post-fetch stages: detect, aggregate, compose
    async fn run_detection(
        &self,
        detector: &dyn ObjectDetector,
        image: &image::RgbImage,
    ) -> String {
        let detections = match detector.detect(image, self.confidence_threshold).await {
            Ok(detections) => detections,
            Err(DetectionError::ModelUnavailable) => {
                info!("detector reported no model loaded");
                return compose(ReplyContext::ModelUnavailable);
            }
            Err(e) => {
                error!(error = %e, "pest detection failed unexpectedly");
                return compose(ReplyContext::InternalError);
            }
        };

        info!("detection complete, found {} pest(s)", detections.len());
        compose(ReplyContext::Summary(aggregate(&detections)))
    }
}
