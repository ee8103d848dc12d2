// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pest detection: capability interface, ONNX implementation, aggregation
//!
//! This module provides:
//! - The `ObjectDetector` trait the pipeline is written against
//! - A CPU-only ONNX YOLO implementation for AgroPest-12
//! - Aggregation of raw detections into a per-class summary

pub mod aggregate;
pub mod capability;
pub mod labels;
pub mod types;
pub mod yolo;

pub use self::aggregate::{aggregate, ClassSummary};
pub use capability::{DetectionError, DetectorInfo, ObjectDetector, DEFAULT_CONFIDENCE_THRESHOLD};
pub use labels::{class_label, AGROPEST_CLASSES};
pub use types::{BoundingBox, Detection};
pub use yolo::{YoloPestModel, MODEL_INPUT_SIZE};
