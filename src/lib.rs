// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod detection;
pub mod dispatch;
pub mod media;
pub mod reply;
pub mod version;

// Re-export the pipeline types
pub use config::AppConfig;
pub use detection::{
    aggregate, class_label, BoundingBox, ClassSummary, Detection, DetectionError, DetectorInfo,
    ObjectDetector, YoloPestModel, AGROPEST_CLASSES, DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use dispatch::{InboundTurn, TurnDispatcher};
pub use media::{FetchError, MediaCredentials, MediaFetcher};
pub use reply::{compose, ReplyContext};

// Re-export the transport layer
pub use api::{start_server, AppState, MessagingResponse, TwilioWebhookRequest};
