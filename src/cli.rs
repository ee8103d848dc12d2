// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! CLI for verifying the detection model outside the webhook path

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::detection::capability::{ObjectDetector, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::detection::yolo::YoloPestModel;

/// Pest detection model checker
#[derive(Parser, Debug)]
#[command(name = "pest-check")]
#[command(version = "1.0.0")]
#[command(about = "Verify the pest detection model is working", long_about = None)]
pub struct Cli {
    /// Path to the ONNX detection model
    #[arg(long, env = "MODEL_PATH", default_value = crate::config::DEFAULT_MODEL_PATH)]
    pub model: String,

    /// Minimum confidence for reported detections
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    pub confidence: f32,

    /// Image to run detection on; omit to only verify the model loads
    pub image: Option<PathBuf>,
}

/// Execute the model check
pub async fn execute(cli: Cli) -> Result<()> {
    println!("Loading model from: {}", cli.model);
    let model = YoloPestModel::load(&cli.model)?;
    println!("✅ Model loaded successfully!");

    let info = model.info();
    println!("\nModel Information:");
    println!("   name: {}", info.name);
    println!("   path: {}", info.model_path);
    println!("   classes ({}): {}", info.num_classes, info.classes.join(", "));

    let Some(image_path) = cli.image else {
        println!("\nNo test image provided.");
        println!("   Usage: pest-check [--model <path>] <image>");
        return Ok(());
    };

    println!("\nRunning detection on: {}", image_path.display());
    let image = image::open(&image_path)
        .context(format!("Could not read image from {}", image_path.display()))?
        .to_rgb8();

    let detections = model.detect(&image, cli.confidence).await?;
    println!("✅ Detection complete! Found {} pest(s):\n", detections.len());

    for (index, detection) in detections.iter().enumerate() {
        let bbox = &detection.bounding_box;
        println!("   {}. {}", index + 1, detection.label);
        println!("      Confidence: {:.1}%", detection.confidence * 100.0);
        println!(
            "      Bounding box: [{:.0}, {:.0}, {:.0}, {:.0}]",
            bbox.x1, bbox.y1, bbox.x2, bbox.y2
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["pest-check"]);
        assert_eq!(cli.model, crate::config::DEFAULT_MODEL_PATH);
        assert!((cli.confidence - DEFAULT_CONFIDENCE_THRESHOLD).abs() < f32::EPSILON);
        assert!(cli.image.is_none());
    }

    #[test]
    fn test_cli_with_image_and_overrides() {
        let cli = Cli::parse_from([
            "pest-check",
            "--model",
            "custom.onnx",
            "--confidence",
            "0.5",
            "photo.jpg",
        ]);
        assert_eq!(cli.model, "custom.onnx");
        assert!((cli.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(cli.image.unwrap(), PathBuf::from("photo.jpg"));
    }

    #[tokio::test]
    async fn test_execute_missing_model_fails() {
        let cli = Cli::parse_from(["pest-check", "--model", "models/nope.onnx"]);
        assert!(execute(cli).await.is_err());
    }
}
