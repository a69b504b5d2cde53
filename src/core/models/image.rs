//! Decoded image evidence
//!
//! Check runners never look at raw bytes. They work on an `ImageEvidence`:
//! dimensions, a summary of the EXIF block, a perceptual hash and a small
//! grayscale thumbnail.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Side length of the grayscale thumbnail kept for pixel comparisons
pub const THUMBNAIL_SIDE: usize = 64;

/// Number of bits in a perceptual hash (16 x 16)
pub const PHASH_BITS: u32 = 256;

/// The parts of an EXIF block the checks care about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifSummary {
    /// Number of EXIF fields found; zero means no EXIF at all
    pub field_count: usize,
    /// Camera manufacturer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    /// Camera model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `DateTimeOriginal`, raw EXIF text (`YYYY:MM:DD HH:MM:SS`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime_original: Option<String>,
    /// `DateTime`, raw EXIF text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    /// Software that last wrote the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    /// Decoded GPS position, when latitude and longitude are both present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GeoPoint>,
}

impl ExifSummary {
    /// Whether any EXIF data was found
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.field_count > 0
    }

    /// Whether both make and model are recorded
    #[must_use]
    pub const fn has_camera_info(&self) -> bool {
        self.make.is_some() && self.model.is_some()
    }

    /// Capture timestamp, preferring `DateTimeOriginal`
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.datetime_original.as_deref().or(self.datetime.as_deref())
    }
}

/// A 256-bit DCT perceptual hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PerceptualHash(pub [u64; 4]);

impl PerceptualHash {
    /// Number of differing bits
    #[must_use]
    pub const fn hamming(&self, other: &Self) -> u32 {
        (self.0[0] ^ other.0[0]).count_ones()
            + (self.0[1] ^ other.0[1]).count_ones()
            + (self.0[2] ^ other.0[2]).count_ones()
            + (self.0[3] ^ other.0[3]).count_ones()
    }

    /// Similarity in 0..=1, where 1 means identical hashes
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f64 {
        1.0 - f64::from(self.hamming(other)) / f64::from(PHASH_BITS)
    }

    /// Lowercase hex form (64 characters)
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|w| format!("{w:016x}")).collect()
    }

    /// Parse the form produced by [`PerceptualHash::to_hex`]
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 || !s.is_ascii() {
            return None;
        }
        let mut words = [0u64; 4];
        for (i, word) in words.iter_mut().enumerate() {
            *word = u64::from_str_radix(&s[i * 16..(i + 1) * 16], 16).ok()?;
        }
        Some(Self(words))
    }
}

impl std::fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PerceptualHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PerceptualHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid perceptual hash"))
    }
}

/// Everything the checks know about one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEvidence {
    /// The reference the image was loaded from
    pub reference: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size of the encoded file in bytes
    pub byte_len: usize,
    /// EXIF summary
    pub exif: ExifSummary,
    /// Perceptual hash
    pub phash: PerceptualHash,
    /// Row-major grayscale thumbnail, `THUMBNAIL_SIDE` squared bytes
    #[serde(skip)]
    pub thumbnail: Vec<u8>,
}

impl ImageEvidence {
    /// `WIDTHxHEIGHT`
    #[must_use]
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Mean absolute luminance difference between two thumbnails (0..=255)
    ///
    /// Returns `None` when either thumbnail is missing or sizes differ.
    #[must_use]
    pub fn mean_abs_difference(&self, other: &Self) -> Option<f64> {
        if self.thumbnail.is_empty() || self.thumbnail.len() != other.thumbnail.len() {
            return None;
        }
        let total: u64 = self
            .thumbnail
            .iter()
            .zip(&other.thumbnail)
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        Some(total as f64 / self.thumbnail.len() as f64)
    }
}
