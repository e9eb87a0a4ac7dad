//! Sandbox and permission policy applied to the rich media iframe.

/// Sandbox tokens granted to the embedded document.
pub const SANDBOX_TOKENS: &[&str] = &["allow-scripts", "allow-same-origin"];

/// Permission-policy features explicitly denied to the embedded document.
pub const DENIED_FEATURES: &[&str] = &[
    "accelerometer",
    "ambient-light-sensor",
    "camera",
    "display-capture",
    "document-domain",
    "fullscreen",
    "geolocation",
    "gyroscope",
    "magnetometer",
    "microphone",
    "midi",
    "payment",
    "publickey-credentials-get",
    "usb",
];

/// Value for the iframe `sandbox` attribute.
pub fn sandbox_attribute() -> String {
    SANDBOX_TOKENS.join(" ")
}

/// Value for the iframe `allow` attribute.
pub fn allow_attribute() -> String {
    DENIED_FEATURES
        .iter()
        .map(|feature| format!("{feature} 'none'"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_grants_scripts_and_same_origin_only() {
        assert_eq!(sandbox_attribute(), "allow-scripts allow-same-origin");
    }

    #[test]
    fn allow_attribute_denies_every_sensitive_feature() {
        let allow = allow_attribute();
        for feature in ["camera", "microphone", "geolocation", "payment", "usb", "midi"] {
            assert!(allow.contains(&format!("{feature} 'none'")), "{feature}");
            assert!(DENIED_FEATURES.contains(&feature));
        }
        assert_eq!(allow.split("; ").count(), DENIED_FEATURES.len());
        assert!(!allow.contains("autoplay"));
    }
}
