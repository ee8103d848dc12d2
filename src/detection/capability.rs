// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection capability interface
//!
//! The pipeline only ever talks to `ObjectDetector`, so the concrete model
//! (ONNX session, sidecar service, test stub) can be swapped without
//! touching the turn handling logic.

use async_trait::async_trait;
use image::RgbImage;
use serde::Serialize;
use thiserror::Error;

use crate::detection::types::Detection;

/// Minimum confidence used when the caller does not override it
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Errors from the detection capability
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("no detection model is loaded")]
    ModelUnavailable,

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Metadata about a loaded detection model
#[derive(Debug, Clone, Serialize)]
pub struct DetectorInfo {
    /// Model name
    pub name: String,
    /// Path the model was loaded from
    pub model_path: String,
    /// Number of classes the model predicts
    pub num_classes: usize,
    /// Class vocabulary
    pub classes: Vec<String>,
}

/// An object detection capability
///
/// Returns one `Detection` per object instance that clears the confidence
/// threshold; an empty `Vec` (never an error) when nothing does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Detect objects in a canonical RGB image
    async fn detect(
        &self,
        image: &RgbImage,
        confidence_threshold: f32,
    ) -> Result<Vec<Detection>, DetectionError>;

    /// Metadata for the status surface
    fn info(&self) -> DetectorInfo;
}
