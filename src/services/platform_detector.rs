//! Platform detection for video URLs.
//!
//! Four ordered pattern families are tried in turn (YouTube, Facebook,
//! Instagram, TikTok); the first family with a matching pattern wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::platform::Platform;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("platform pattern must compile"))
        .collect()
}

static YOUTUBE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
        r"youtube\.com/shorts/([^&\n?#]+)",
    ])
});

static FACEBOOK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"facebook\.com/.*/videos/([0-9]+)",
        r"facebook\.com/watch/?\?v=([0-9]+)",
        r"fb\.watch/([^/?]+)",
        r"facebook\.com/reel/([0-9]+)",
    ])
});

static INSTAGRAM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"instagram\.com/reel/([^/?]+)",
        r"instagram\.com/p/([^/?]+)",
        r"instagram\.com/reels/([^/?]+)",
        r"instagr\.am/reel/([^/?]+)",
        r"instagr\.am/p/([^/?]+)",
    ])
});

static TIKTOK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"tiktok\.com/@[^/]+/video/([0-9]+)",
        r"tiktok\.com/t/([^/?]+)",
        r"vm\.tiktok\.com/([^/?]+)",
        r"tiktok\.com/v/([0-9]+)",
    ])
});

/// Pattern families in the order they are tried.
fn families() -> [(Platform, &'static [Regex]); 4] {
    [
        (Platform::Youtube, YOUTUBE_PATTERNS.as_slice()),
        (Platform::Facebook, FACEBOOK_PATTERNS.as_slice()),
        (Platform::Instagram, INSTAGRAM_PATTERNS.as_slice()),
        (Platform::Tiktok, TIKTOK_PATTERNS.as_slice()),
    ]
}

/// Returns the platform of the first family with a matching pattern, or `Unknown`.
pub fn detect_platform(url: &str) -> Platform {
    families()
        .into_iter()
        .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(url)))
        .map(|(platform, _)| platform)
        .unwrap_or(Platform::Unknown)
}

/// Returns the first capture group of the first matching pattern, in family order.
pub fn extract_video_id(url: &str) -> Option<String> {
    families().into_iter().find_map(|(_, patterns)| {
        patterns
            .iter()
            .find_map(|re| re.captures(url))
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    })
}

/// True when the URL belongs to one of the supported platforms.
pub fn is_valid_video_url(url: &str) -> bool {
    detect_platform(url) != Platform::Unknown
}

pub fn youtube_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", video_id)
}

pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Branded placeholder image for platforms without public thumbnails.
pub fn platform_placeholder(platform: Platform) -> String {
    let svg = match platform {
        Platform::Youtube => {
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 225" fill="none"><rect width="400" height="225" fill="#FF0000"/><path d="M160 82.5v60l52-30-52-30z" fill="white"/></svg>"##
        }
        Platform::Facebook => {
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 225" fill="none"><rect width="400" height="225" fill="#1877F2"/><circle cx="200" cy="112.5" r="60" fill="white"/></svg>"##
        }
        Platform::Instagram => {
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 225" fill="none"><rect width="400" height="225" fill="#E1306C"/><rect x="150" y="62.5" width="100" height="100" rx="25" stroke="white" stroke-width="8" fill="none"/><circle cx="200" cy="112.5" r="25" stroke="white" stroke-width="8" fill="none"/></svg>"##
        }
        Platform::Tiktok => {
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 225" fill="none"><rect width="400" height="225" fill="#010101"/><path d="M237.5 52.5c0 22 18 40 40 40v25c-14 0-27-4.5-38-12.5v57c0 33.5-27 60.5-60 60.5s-60-27-60-60.5c0-33.5 27-60.5 60-60.5v25c-19.5 0-35 16-35 35.5s15.5 35.5 35 35.5 35-16 35-35.5V52.5h23z" fill="white"/></svg>"##
        }
        Platform::Unknown => return "/placeholder.svg".to_string(),
    };
    let encoded: String = url::form_urlencoded::byte_serialize(svg.as_bytes()).collect();
    format!("data:image/svg+xml,{}", encoded.replace('+', "%20"))
}

/// Thumbnail for any supported URL: the real YouTube image, otherwise a placeholder.
pub fn thumbnail_for(url: &str) -> String {
    let platform = detect_platform(url);
    match (platform, extract_video_id(url)) {
        (Platform::Youtube, Some(id)) => youtube_thumbnail(&id),
        _ => platform_placeholder(platform),
    }
}
