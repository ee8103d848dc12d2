// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reply composition
//!
//! Maps every turn outcome to exactly one fixed reply string. Pure
//! formatting: no I/O, no failure path — every branch returns a non-empty
//! message and never exposes internal error detail.

use crate::detection::aggregate::ClassSummary;
use crate::detection::labels::AGROPEST_CLASSES;

/// Text tokens that route a text-only turn to the welcome message
const GREETING_TOKENS: &[&str] = &["hi", "hello", "start", "help"];

/// Outcome of a turn, as seen by the composer
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyContext {
    /// Text-only turn; the body decides greeting vs. unrecognized
    NoMedia(String),
    /// Media attached, but its declared content type is not an image
    NonImageMedia,
    /// No detection model is loaded
    ModelUnavailable,
    /// Media could not be retrieved or decoded
    FetchFailure,
    /// Detection ran; the summary may be empty
    Summary(Vec<ClassSummary>),
    /// Catch-all for unexpected internal failures
    InternalError,
}

/// Compose the reply for a turn outcome
pub fn compose(context: ReplyContext) -> String {
    match context {
        ReplyContext::NoMedia(text) => {
            if is_greeting(&text) {
                welcome_message()
            } else {
                "📸 Please send an image of a crop pest for identification.\n\n\
                 Type 'help' for instructions."
                    .to_string()
            }
        }
        ReplyContext::NonImageMedia => {
            "❌ Please send an image file (JPG, PNG, etc.)".to_string()
        }
        ReplyContext::ModelUnavailable => {
            "❌ Model not loaded. Please check server configuration.".to_string()
        }
        ReplyContext::FetchFailure => {
            "❌ Could not download image. Please try again.".to_string()
        }
        ReplyContext::Summary(entries) => summary_message(&entries),
        ReplyContext::InternalError => {
            "❌ An error occurred. Please try again later.".to_string()
        }
    }
}

/// Greeting classification, case- and whitespace-insensitive
fn is_greeting(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    GREETING_TOKENS.contains(&normalized.as_str())
}

fn welcome_message() -> String {
    format!(
        "👋 *Welcome to Crop Pest Detection Bot!*\n\n\
         📸 *How to use:*\n\
         1. Take a photo of a crop pest or insect\n\
         2. Send the image to this number\n\
         3. Get instant pest identification!\n\n\
         🔍 *Supported pests:*\n\
         {}\n\n\
         Send an image to get started! 🐛",
        AGROPEST_CLASSES.join(", ")
    )
}

/// Render the detection summary, one line per class in aggregator order
fn summary_message(entries: &[ClassSummary]) -> String {
    if entries.is_empty() {
        return "❌ No pests detected in the image. Please try another photo.".to_string();
    }

    let mut message = String::from("🐛 *Pest Detection Results:*\n\n");
    for entry in entries {
        message.push_str(&format!(
            "• *{}*: {} detected ({:.1}% confidence)\n",
            entry.label,
            entry.count,
            entry.mean_confidence * 100.0
        ));
    }
    message.push_str("\n📸 Send another image to detect more pests!");
    message
}
