//! Image decoding - bytes to `ImageEvidence`
//!
//! Pixels come from the `image` crate, EXIF from `kamadak-exif`. A file
//! without EXIF decodes fine; its summary is simply empty.

use std::io::Cursor;

use exif::{Exif, In, Tag, Value};
use image::imageops::FilterType;

use crate::core::error::CheckExecutionError;
use crate::core::models::{ExifSummary, GeoPoint, ImageEvidence, THUMBNAIL_SIDE};
use crate::core::services::perceptual_hash;

/// Decode encoded image bytes into evidence
pub fn decode(reference: &str, bytes: &[u8]) -> Result<ImageEvidence, CheckExecutionError> {
    let img = image::load_from_memory(bytes).map_err(|e| CheckExecutionError::Decode {
        reference: reference.to_string(),
        reason: e.to_string(),
    })?;

    #[allow(clippy::cast_possible_truncation)]
    let side = THUMBNAIL_SIDE as u32;
    let thumbnail = img.resize_exact(side, side, FilterType::Triangle).to_luma8().into_raw();

    Ok(ImageEvidence {
        reference: reference.to_string(),
        width: img.width(),
        height: img.height(),
        byte_len: bytes.len(),
        exif: read_exif(bytes),
        phash: perceptual_hash(&thumbnail),
        thumbnail,
    })
}

/// Summarize the EXIF block; empty when there is none or it is unreadable
#[must_use]
pub fn read_exif(bytes: &[u8]) -> ExifSummary {
    let Ok(exif) = exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) else {
        return ExifSummary::default();
    };
    ExifSummary {
        field_count: exif.fields().count(),
        make: ascii(&exif, Tag::Make),
        model: ascii(&exif, Tag::Model),
        datetime_original: ascii(&exif, Tag::DateTimeOriginal),
        datetime: ascii(&exif, Tag::DateTime),
        software: ascii(&exif, Tag::Software),
        gps: gps(&exif),
    }
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(parts) = &field.value else {
        return None;
    };
    let text = parts
        .iter()
        .map(|p| String::from_utf8_lossy(p).trim_matches(char::from(0)).trim().to_string())
        .find(|s| !s.is_empty())?;
    Some(text)
}

fn gps(exif: &Exif) -> Option<GeoPoint> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S')?;
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W')?;
    let point = GeoPoint::new(latitude, longitude);
    point.is_valid().then_some(point)
}

/// Degrees/minutes/seconds to signed decimal degrees
fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative: char) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    let component = |i: usize| parts.get(i).map_or(0.0, |r| r.to_f64());
    if parts.is_empty() {
        return None;
    }
    let degrees = component(0) + component(1) / 60.0 + component(2) / 3600.0;
    if !degrees.is_finite() {
        return None;
    }

    let is_negative = ascii(exif, ref_tag)
        .and_then(|r| r.chars().next())
        .is_some_and(|c| c.eq_ignore_ascii_case(&negative));
    Some(if is_negative { -degrees } else { degrees })
}
