// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AgroPest-12 class vocabulary

/// Class names for AgroPest-12, in model output order
pub const AGROPEST_CLASSES: [&str; 12] = [
    "Ants",
    "Bees",
    "Beetles",
    "Caterpillars",
    "Earthworms",
    "Earwigs",
    "Grasshoppers",
    "Moths",
    "Slugs",
    "Snails",
    "Wasps",
    "Weevils",
];

/// Resolve a class id to its label
///
/// Ids outside the AgroPest-12 vocabulary render as `Class_{id}` so an
/// unexpected model output still produces a presentable label.
pub fn class_label(class_id: usize) -> String {
    AGROPEST_CLASSES
        .get(class_id)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("Class_{}", class_id))
}
