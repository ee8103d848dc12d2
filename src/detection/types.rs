// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Raw detection types produced by the detection capability

use serde::Serialize;

/// Axis-aligned bounding box in source image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 > x1 && y2 > y1 {
            (x2 - x1) * (y2 - y1)
        } else {
            0.0
        }
    }

    /// Intersection over union with another box, 0.0 when the union is empty
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One detected object instance
///
/// Produced once per object by the detection capability; immutable and
/// scoped to a single turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Class label (one of the AgroPest-12 names, or a numeric-id fallback)
    pub label: String,
    /// Confidence score in [0, 1]
    pub confidence: f32,
    /// Location in source image pixel coordinates
    pub bounding_box: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        BoundingBox { x1, y1, x2, y2 }
    }

    #[test]
    fn test_area() {
        assert_eq!(boxed(0.0, 0.0, 10.0, 5.0).area(), 50.0);
    }

    #[test]
    fn test_area_degenerate_box_is_zero() {
        assert_eq!(boxed(10.0, 10.0, 5.0, 5.0).area(), 0.0);
    }

    #[test]
    fn test_iou_identical_boxes() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_boxes() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = boxed(0.0, 0.0, 10.0, 10.0);
        let b = boxed(5.0, 0.0, 15.0, 10.0);
        // intersection 50, union 150
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_detection_serializes() {
        let det = Detection {
            label: "Ants".to_string(),
            confidence: 0.9,
            bounding_box: boxed(1.0, 2.0, 3.0, 4.0),
        };
        let json = serde_json::to_value(&det).unwrap();
        assert_eq!(json["label"], "Ants");
        assert_eq!(json["bounding_box"]["x1"], 1.0);
    }
}
