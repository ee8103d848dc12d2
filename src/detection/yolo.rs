// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX YOLO detector for AgroPest-12
//!
//! Wraps an exported YOLO detection graph behind the `ObjectDetector`
//! trait:
//! - ONNX model loading from disk (CPU execution provider)
//! - Letterbox preprocessing to the fixed network input size
//! - Confidence filtering, per-class NMS, box remapping to source pixels
//!
//! Runs on CPU only; the webhook workload is a single image per turn.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::imageops::FilterType;
use image::RgbImage;
use ndarray::{Array4, ArrayView2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tracing::{debug, info};

use crate::detection::capability::{DetectionError, DetectorInfo, ObjectDetector};
use crate::detection::labels::{class_label, AGROPEST_CLASSES};
use crate::detection::types::{BoundingBox, Detection};

/// Network input edge length in pixels
pub const MODEL_INPUT_SIZE: u32 = 640;

/// IoU threshold for non-maximum suppression
const IOU_THRESHOLD: f32 = 0.45;

/// Letterbox padding fill value (YOLO convention, gray 114)
const PAD_FILL: f32 = 114.0 / 255.0;

/// ONNX-based pest detection model
///
/// # Thread Safety
/// The ort session needs `&mut` to run, so it sits behind a Mutex; the
/// struct itself is cheap to share via Arc across concurrent turns.
pub struct YoloPestModel {
    /// ONNX Runtime session
    session: Arc<Mutex<Session>>,

    /// Path the model was loaded from
    model_path: String,

    /// Model name derived from the file stem
    model_name: String,
}

/// Mapping from source image coordinates into the letterboxed input
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

impl YoloPestModel {
    /// Load a YOLO detection model from an ONNX file
    ///
    /// # Errors
    /// Returns an error if the file does not exist or ONNX Runtime cannot
    /// build a session from it. There is no fallback model: a load failure
    /// means the detection capability is simply not available.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("detection model file not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let model_name = model_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("pest-detector")
            .to_string();

        info!(
            "Pest detection model '{}' loaded from {}",
            model_name,
            model_path.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            model_path: model_path.display().to_string(),
            model_name,
        })
    }
}

impl std::fmt::Debug for YoloPestModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloPestModel")
            .field("model_name", &self.model_name)
            .field("model_path", &self.model_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ObjectDetector for YoloPestModel {
    async fn detect(
        &self,
        image: &RgbImage,
        confidence_threshold: f32,
    ) -> Result<Vec<Detection>, DetectionError> {
        let (src_width, src_height) = image.dimensions();
        let (input, letterbox) = preprocess(image, MODEL_INPUT_SIZE);

        let input_value = Value::from_array(input)
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        // Lock the session for the duration of the run
        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectionError::Inference("session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs!["images" => input_value])
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        // Use index [0] instead of name since exports vary in output naming
        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        let shape = output.shape();
        if shape.len() != 3 || shape[1] < 5 {
            return Err(DetectionError::Inference(format!(
                "unexpected model output shape: {:?} (expected [1, 4+classes, anchors])",
                shape
            )));
        }

        let predictions = output.index_axis(Axis(0), 0);
        let predictions = predictions
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|e| DetectionError::Inference(e.to_string()))?;

        let detections = postprocess(
            predictions,
            &letterbox,
            src_width,
            src_height,
            confidence_threshold,
        );

        debug!(
            "inference complete: {} detections above {:.2} threshold",
            detections.len(),
            confidence_threshold
        );

        Ok(detections)
    }

    fn info(&self) -> DetectorInfo {
        DetectorInfo {
            name: self.model_name.clone(),
            model_path: self.model_path.clone(),
            num_classes: AGROPEST_CLASSES.len(),
            classes: AGROPEST_CLASSES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Letterbox an RGB image into a square NCHW f32 tensor
///
/// Preserves aspect ratio, pads with gray, normalizes to [0, 1].
fn preprocess(image: &RgbImage, size: u32) -> (Array4<f32>, Letterbox) {
    let (width, height) = image.dimensions();
    let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
    let scaled_width = ((width as f32 * scale).round() as u32).max(1);
    let scaled_height = ((height as f32 * scale).round() as u32).max(1);

    let resized = image::imageops::resize(image, scaled_width, scaled_height, FilterType::Triangle);

    let pad_x = (size - scaled_width) / 2;
    let pad_y = (size - scaled_height) / 2;

    let mut input = Array4::from_elem((1, 3, size as usize, size as usize), PAD_FILL);
    for (x, y, pixel) in resized.enumerate_pixels() {
        let row = (y + pad_y) as usize;
        let col = (x + pad_x) as usize;
        for channel in 0..3 {
            input[[0, channel, row, col]] = pixel[channel] as f32 / 255.0;
        }
    }

    (
        input,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    )
}

/// Decode a `[4 + classes, anchors]` prediction grid into detections
///
/// Anchor columns carry `cx, cy, w, h` in letterboxed coordinates followed
/// by per-class scores. Boxes are remapped to source pixels, clamped to the
/// image bounds, deduplicated with per-class NMS and sorted by descending
/// confidence.
fn postprocess(
    predictions: ArrayView2<'_, f32>,
    letterbox: &Letterbox,
    src_width: u32,
    src_height: u32,
    confidence_threshold: f32,
) -> Vec<Detection> {
    let num_classes = predictions.shape()[0] - 4;
    let num_anchors = predictions.shape()[1];

    let mut candidates = Vec::new();
    for anchor in 0..num_anchors {
        let mut best_class = 0usize;
        let mut best_score = 0.0f32;
        for class in 0..num_classes {
            let score = predictions[[4 + class, anchor]];
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        if best_score < confidence_threshold {
            continue;
        }

        let cx = predictions[[0, anchor]];
        let cy = predictions[[1, anchor]];
        let w = predictions[[2, anchor]];
        let h = predictions[[3, anchor]];

        let x1 = (cx - w / 2.0 - letterbox.pad_x) / letterbox.scale;
        let y1 = (cy - h / 2.0 - letterbox.pad_y) / letterbox.scale;
        let x2 = (cx + w / 2.0 - letterbox.pad_x) / letterbox.scale;
        let y2 = (cy + h / 2.0 - letterbox.pad_y) / letterbox.scale;

        candidates.push(Detection {
            label: class_label(best_class),
            confidence: best_score,
            bounding_box: BoundingBox {
                x1: x1.clamp(0.0, src_width as f32),
                y1: y1.clamp(0.0, src_height as f32),
                x2: x2.clamp(0.0, src_width as f32),
                y2: y2.clamp(0.0, src_height as f32),
            },
        });
    }

    let mut kept = non_max_suppression(candidates, IOU_THRESHOLD);
    kept.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    kept
}

/// Greedy per-class non-maximum suppression
fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    'candidates: for candidate in candidates {
        for winner in &kept {
            if winner.label == candidate.label
                && winner.bounding_box.iou(&candidate.bounding_box) >= iou_threshold
            {
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }
    kept
}
