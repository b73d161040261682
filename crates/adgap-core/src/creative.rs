use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw ad creative as returned by the retrieval service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCreative {
    /// Identifier assigned by the ad library. Unique within one analysis run.
    pub id: String,
    pub brand_name: String,
    /// Primary body copy.
    pub text: String,
    pub title: Option<String>,
    pub image_ref: Option<String>,
    pub video_ref: Option<String>,
    /// Publisher platform, e.g. `facebook` or `instagram`.
    pub platform: String,
    /// When the ad started delivering, if the library reports it.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl AdCreative {
    /// Format bucket for this creative.
    ///
    /// Only `video` and `image` are ever produced: a creative with a video
    /// reference is a video, everything else counts as an image.
    #[must_use]
    pub fn format(&self) -> AdFormat {
        if self.video_ref.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            AdFormat::Video
        } else {
            AdFormat::Image
        }
    }
}

/// Creative format buckets tracked in [`crate::FormatDistribution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    Video,
    Image,
    UgcVideo,
    Carousel,
}

impl AdFormat {
    pub const ALL: [AdFormat; 4] = [
        AdFormat::Video,
        AdFormat::Image,
        AdFormat::UgcVideo,
        AdFormat::Carousel,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AdFormat::Video => "video",
            AdFormat::Image => "image",
            AdFormat::UgcVideo => "ugc_video",
            AdFormat::Carousel => "carousel",
        }
    }
}

impl std::fmt::Display for AdFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
