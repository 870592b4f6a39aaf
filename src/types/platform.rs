use serde::{Deserialize, Serialize};

/// Video hosting platform recognised from a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Facebook,
    Instagram,
    Tiktok,
    Unknown,
}

impl Platform {
    /// Human-readable platform name.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Tiktok => "TikTok",
            Platform::Unknown => "Unknown",
        }
    }

    /// Lowercase identifier as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Unknown => "unknown",
        }
    }
}
