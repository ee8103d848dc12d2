// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Media retrieval and decoding
//!
//! This module provides:
//! - Authenticated, timeout-bounded media download
//! - Decoding into a canonical RGB representation

pub mod fetcher;
pub mod image_utils;

pub use fetcher::{FetchError, MediaCredentials, MediaFetcher};
pub use image_utils::{decode_rgb_image, detect_format, ImageError, ImageInfo};
