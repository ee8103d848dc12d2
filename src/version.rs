// Version information for the Fabstir Pest Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-agropest-12-2025-11-02";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 1;

/// Minor version number
pub const VERSION_MINOR: u32 = 0;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "whatsapp-webhook",
    "twiml-replies",
    "authenticated-media-download",
    "onnx-cpu-detection",
    "agropest-12",
    "detection-aggregation",
    "status-endpoint",
    "model-check-cli",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Pest Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert_eq!(VERSION_MAJOR, 1);
        assert_eq!(VERSION_MINOR, 0);
        assert_eq!(VERSION_PATCH, 0);
        assert!(FEATURES.contains(&"whatsapp-webhook"));
        assert!(FEATURES.contains(&"agropest-12"));
    }

    #[test]
    fn test_version_string() {
        let version = get_version_string();
        assert!(version.contains("1.0.0"));
        assert!(version.contains("2025-11-02"));
    }

    #[test]
    fn test_version_format() {
        assert_eq!(VERSION, "v1.0.0-agropest-12-2025-11-02");
        assert_eq!(VERSION_NUMBER, "1.0.0");
        assert_eq!(BUILD_DATE, "2025-11-02");
    }
}
