//! Background image: decoding, data URLs, placement and painting.
//!
//! ## Placement
//!
//! The image is scaled to cover the card interior (cover-fit), multiplied
//! by the zoom, centered and shifted by the pan. The pan is clamped at
//! paint time so the unrotated image always covers the interior; the
//! stored pan itself is left untouched. Rotation turns the image about
//! its own center and the result is clipped to the interior.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::canvas::Canvas;
use super::transform::rotate_about_deg;
use crate::error::QuoteCardError;
use crate::layout::Rect;
use crate::style::{Color, deserialize_f32};

pub const DEFAULT_IMAGE_OPACITY: f32 = 0.3;
pub const MIN_IMAGE_ZOOM: f32 = 1.0;
pub const MAX_IMAGE_ZOOM: f32 = 3.0;
pub const MAX_IMAGE_ROTATION: f32 = 360.0;
pub const IMAGE_ZOOM_STEP: f32 = 0.1;
pub const IMAGE_OPACITY_STEP: f32 = 0.05;

// ============================================================================
// TRANSFORM
// ============================================================================

/// User-controlled image transform, stored with templates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    #[serde(rename = "bgImagePanX", deserialize_with = "deserialize_f32")]
    pub pan_x: f32,
    #[serde(rename = "bgImagePanY", deserialize_with = "deserialize_f32")]
    pub pan_y: f32,
    #[serde(rename = "bgImageZoom", deserialize_with = "deserialize_f32")]
    pub zoom: f32,
    /// Degrees, clockwise.
    #[serde(rename = "bgImageRotate", deserialize_with = "deserialize_f32")]
    pub rotation: f32,
    #[serde(rename = "bgImageOpacity", deserialize_with = "deserialize_f32")]
    pub opacity: f32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: MIN_IMAGE_ZOOM,
            rotation: 0.0,
            opacity: DEFAULT_IMAGE_OPACITY,
        }
    }
}

impl ImageTransform {
    /// Clamp into range; non-finite values take their defaults.
    pub fn sanitized(self) -> Self {
        let or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        Self {
            pan_x: or(self.pan_x, 0.0),
            pan_y: or(self.pan_y, 0.0),
            zoom: or(self.zoom, MIN_IMAGE_ZOOM).clamp(MIN_IMAGE_ZOOM, MAX_IMAGE_ZOOM),
            rotation: or(self.rotation, 0.0).clamp(0.0, MAX_IMAGE_ROTATION),
            opacity: or(self.opacity, DEFAULT_IMAGE_OPACITY).clamp(0.0, 1.0),
        }
    }

    pub fn reset_position(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

/// Where the unrotated image lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Cover-fit `image_width × image_height` into `interior`, then zoom, pan and clamp.
    pub fn compute(
        interior: Rect,
        image_width: f32,
        image_height: f32,
        transform: &ImageTransform,
    ) -> Self {
        let image_aspect = image_width / image_height.max(1.0);
        let area_aspect = interior.width / interior.height.max(1.0);

        // Rounding in the aspect division can leave the fitted side a hair
        // short of the interior, so snap it up
        let (base_width, base_height) = if image_aspect > area_aspect {
            ((interior.height * image_aspect).max(interior.width), interior.height)
        } else {
            (interior.width, (interior.width / image_aspect).max(interior.height))
        };

        let zoom = transform.zoom.max(MIN_IMAGE_ZOOM);
        let width = base_width * zoom;
        let height = base_height * zoom;

        let x = interior.x + (interior.width - width) / 2.0 + transform.pan_x;
        let y = interior.y + (interior.height - height) / 2.0 + transform.pan_y;

        // Bounds can cross by an ulp, where f32::clamp panics
        let x = x.max(interior.right() - width).min(interior.x);
        let y = y.max(interior.bottom() - height).min(interior.y);

        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ============================================================================
// IMAGE
// ============================================================================

/// A decoded background image and the data URL it came from.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    bitmap: Arc<RgbaImage>,
    data_url: String,
}

impl BackgroundImage {
    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: &str) -> Result<Self, QuoteCardError> {
        let (mime, bytes) = decode_data_url(data_url)?;
        let bitmap = decode_image(&bytes, &mime)?;
        Ok(Self {
            bitmap: Arc::new(bitmap),
            data_url: data_url.to_string(),
        })
    }

    /// Decode raw file bytes; the data URL is built from the sniffed format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QuoteCardError> {
        let mime = sniff_mime(bytes);
        let bitmap = decode_image(bytes, mime)?;
        Ok(Self {
            bitmap: Arc::new(bitmap),
            data_url: encode_data_url(mime, bytes),
        })
    }

    /// Wrap an already decoded bitmap (stored as a PNG data URL).
    pub fn from_rgba(bitmap: RgbaImage) -> Result<Self, QuoteCardError> {
        let png = super::canvas::encode_png(&bitmap)?;
        Ok(Self {
            bitmap: Arc::new(bitmap),
            data_url: encode_data_url("image/png", &png),
        })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Where this image lands inside `interior` under `transform`.
    pub fn placement(&self, interior: Rect, transform: &ImageTransform) -> Placement {
        Placement::compute(
            interior,
            self.width() as f32,
            self.height() as f32,
            transform,
        )
    }

    /// Paint into `canvas`, clipped to `interior`, at the transform's opacity.
    pub fn paint(&self, canvas: &mut Canvas, interior: Rect, transform: &ImageTransform) {
        if transform.opacity <= 0.0 || self.width() == 0 || self.height() == 0 {
            return;
        }

        let placement = self.placement(interior, transform);
        let (cx, cy) = placement.center();
        let (img_w, img_h) = (self.width() as f32, self.height() as f32);
        let (x0, y0, x1, y1) = canvas.pixel_bounds(interior);

        for py in y0..y1 {
            for px in x0..x1 {
                let (sx, sy) = (px as f32 + 0.5, py as f32 + 0.5);
                // Inverse rotation maps the canvas point back into image space
                let (ux, uy) = rotate_about_deg(sx, sy, cx, cy, -transform.rotation);
                let u = (ux - placement.x) / placement.width * img_w;
                let v = (uy - placement.y) / placement.height * img_h;

                if !(0.0..img_w).contains(&u) || !(0.0..img_h).contains(&v) {
                    continue;
                }

                let Some(sample) = image::imageops::interpolate_bilinear(
                    self.bitmap.as_ref(),
                    (u - 0.5).clamp(0.0, img_w - 1.0),
                    (v - 0.5).clamp(0.0, img_h - 1.0),
                ) else {
                    continue;
                };

                let [r, g, b, a] = sample.0;
                let alpha = transform.opacity * a as f32 / 255.0;
                canvas.blend(px as i32, py as i32, Color::rgb(r, g, b), alpha);
            }
        }
    }
}

// ============================================================================
// DATA URLS
// ============================================================================

/// Build a base64 data URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and decoded payload.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), QuoteCardError> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| QuoteCardError::Image("Not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| QuoteCardError::Image("Malformed data URL".to_string()))?;

    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default().trim().to_lowercase();
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(QuoteCardError::Image(
            "Only base64 data URLs are supported".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| QuoteCardError::Image(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime, bytes))
}

/// MIME type from magic bytes (`application/octet-stream` when unknown).
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if is_heic(bytes) {
        return "image/heic";
    }
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

fn decode_image(bytes: &[u8], mime: &str) -> Result<RgbaImage, QuoteCardError> {
    let decoded = if is_heic(bytes) || matches!(mime, "image/heic" | "image/heif") {
        decode_heic(bytes)?
    } else {
        image::load_from_memory(bytes)
            .map_err(|e| QuoteCardError::Image(format!("Could not load the image: {}", e)))?
    };

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(QuoteCardError::Image("Image has no pixels".to_string()));
    }
    Ok(decoded.to_rgba8())
}

/// Check if the data looks like a HEIC/HEIF file by examining magic bytes.
fn is_heic(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    matches!(
        &data[8..12],
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"hevm" | b"hevs" | b"mif1" | b"msf1"
    )
}

#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<DynamicImage, QuoteCardError> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let heic_err = |e: &dyn std::fmt::Display| QuoteCardError::Image(format!("HEIC: {}", e));
    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data).map_err(|e| heic_err(&e))?;
    let handle = ctx.primary_image_handle().map_err(|e| heic_err(&e))?;
    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| heic_err(&e))?;

    let planes = image.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| QuoteCardError::Image("No interleaved RGB data in HEIC".to_string()))?;

    let (width, height) = (image.width(), image.height());
    let mut rgb_image = image::RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let offset = y as usize * interleaved.stride + x as usize * 3;
            if offset + 2 < interleaved.data.len() {
                let px = &interleaved.data[offset..offset + 3];
                rgb_image.put_pixel(x, y, image::Rgb([px[0], px[1], px[2]]));
            }
        }
    }

    Ok(DynamicImage::ImageRgb8(rgb_image))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<DynamicImage, QuoteCardError> {
    Err(QuoteCardError::Image(
        "HEIC/HEIF images need the `heif` feature".to_string(),
    ))
}
