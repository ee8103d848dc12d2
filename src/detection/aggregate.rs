// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Aggregation of raw detections into a per-class summary

use std::collections::HashMap;

use serde::Serialize;

use crate::detection::types::Detection;

/// Per-class rollup of a detection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    /// Class label, exactly as reported by the detector
    pub label: String,
    /// Number of instances of this class
    pub count: usize,
    /// Arithmetic mean of the instance confidences, in [0, 1]
    pub mean_confidence: f32,
}

/// Group detections by exact label and compute per-class count and mean
/// confidence.
///
/// Labels appear in the summary in first-seen input order. The detector
/// happens to return detections sorted by descending confidence, but the
/// fold does not rely on that — any input order produces a correct summary,
/// the order only decides which class is listed first.
pub fn aggregate(detections: &[Detection]) -> Vec<ClassSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (usize, f32)> = HashMap::new();

    for detection in detections {
        let entry = groups.entry(detection.label.as_str()).or_insert_with(|| {
            order.push(detection.label.as_str());
            (0, 0.0)
        });
        entry.0 += 1;
        entry.1 += detection.confidence;
    }

    order
        .into_iter()
        .map(|label| {
            let (count, confidence_sum) = groups[label];
            ClassSummary {
                label: label.to_string(),
                count,
                mean_confidence: confidence_sum / count as f32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::BoundingBox;

    fn detection(label: &str, confidence: f32) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
            bounding_box: BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
            },
        }
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_groups_and_averages() {
        // Scenario: two Ants (0.9, 0.7) and one Bees (0.5)
        let detections = vec![
            detection("Ants", 0.9),
            detection("Ants", 0.7),
            detection("Bees", 0.5),
        ];

        let summary = aggregate(&detections);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].label, "Ants");
        assert_eq!(summary[0].count, 2);
        assert!((summary[0].mean_confidence - 0.8).abs() < 1e-6);

        assert_eq!(summary[1].label, "Bees");
        assert_eq!(summary[1].count, 1);
        assert!((summary[1].mean_confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let detections = vec![
            detection("Wasps", 0.3),
            detection("Ants", 0.95),
            detection("Wasps", 0.8),
        ];

        let summary = aggregate(&detections);
        assert_eq!(summary[0].label, "Wasps");
        assert_eq!(summary[1].label, "Ants");
    }

    #[test]
    fn test_counts_sum_to_input_length() {
        let detections = vec![
            detection("Slugs", 0.4),
            detection("Snails", 0.6),
            detection("Slugs", 0.5),
            detection("Moths", 0.9),
            detection("Slugs", 0.3),
        ];

        let summary = aggregate(&detections);
        let total: usize = summary.iter().map(|entry| entry.count).sum();
        assert_eq!(total, detections.len());
    }

    #[test]
    fn test_labels_are_distinct() {
        let detections = vec![
            detection("Beetles", 0.5),
            detection("Beetles", 0.6),
            detection("Beetles", 0.7),
        ];

        let summary = aggregate(&detections);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].count, 3);
    }

    #[test]
    fn test_case_sensitive_grouping() {
        let detections = vec![detection("ants", 0.5), detection("Ants", 0.5)];
        assert_eq!(aggregate(&detections).len(), 2);
    }

    #[test]
    fn test_out_of_vocabulary_label_passes_through() {
        let detections = vec![detection("Class_17", 0.42)];
        let summary = aggregate(&detections);
        assert_eq!(summary[0].label, "Class_17");
        assert_eq!(summary[0].count, 1);
    }

    #[test]
    fn test_mean_confidence_within_bounds() {
        let detections = vec![
            detection("Earwigs", 0.0),
            detection("Earwigs", 1.0),
            detection("Earwigs", 0.5),
        ];

        let summary = aggregate(&detections);
        assert!(summary[0].mean_confidence >= 0.0);
        assert!(summary[0].mean_confidence <= 1.0);
        assert!((summary[0].mean_confidence - 0.5).abs() < 1e-6);
    }
}
