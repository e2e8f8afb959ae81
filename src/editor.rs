//! # Editor State
//!
//! The interaction controller: owns the card parameters, the optional
//! background image and the current pointer gesture.
//!
//! ## Gestures
//!
//! ```text
//!                 pointer_down on text        pointer_move: offset += dy
//!   Idle ─────────────────────────────▶ DraggingText ──────┐
//!    │ ▲                                                    │
//!    │ │ pointer_up / leave / cancel                        │
//!    │ └────────────────────────────────────────────────────┘
//!    │    pointer_down on interior (image loaded)
//!    ├────────────────────────────────▶ PanningImage   pointer_move: pan += (dx, dy)
//!    │    begin_resize
//!    └────────────────────────────────▶ Resizing       pointer_move: size = start + delta
//! ```
//!
//! Text always wins over image panning. Every terminal pointer event
//! returns the editor to `Idle`.

use image::RgbaImage;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::QuoteCardError;
use crate::export;
use crate::font::FontBook;
use crate::hit_test::Element;
use crate::layout::CardLayout;
use crate::render::background::{
    IMAGE_OPACITY_STEP, IMAGE_ZOOM_STEP, MAX_IMAGE_ROTATION, MAX_IMAGE_ZOOM, MIN_IMAGE_ZOOM,
};
use crate::render::{BackgroundImage, ImageTransform, Scene, render_card};
use crate::store::templates::{TemplateContent, TemplateSettings};
use crate::style::{Color, ContentStrings, MAX_CARD_SIZE, MIN_CARD_SIZE, ManualOffsets, StyleParameters};

// ============================================================================
// PREVIEW BACKGROUND
// ============================================================================

/// Backdrop behind the card in the editor preview (not part of the export).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewBackground {
    #[default]
    Light,
    Dark,
}

impl PreviewBackground {
    pub fn color(&self) -> Color {
        match self {
            PreviewBackground::Light => Color::WHITE,
            PreviewBackground::Dark => Color::rgb(0x1A, 0x1A, 0x1A),
        }
    }
}

impl<'de> Deserialize<'de> for PreviewBackground {
    /// Anything other than `"dark"` (including `null`) means light.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(match value.as_deref() {
            Some("dark") => PreviewBackground::Dark,
            _ => PreviewBackground::Light,
        })
    }
}

// ============================================================================
// GESTURES
// ============================================================================

/// Pointer cursor hint for the current position or gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
    Move,
}

impl Cursor {
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Move => "move",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    DraggingText {
        element: Element,
        last_y: f32,
    },
    PanningImage {
        last_x: f32,
        last_y: f32,
    },
    Resizing {
        origin_x: f32,
        origin_y: f32,
        start_width: u32,
        start_height: u32,
    },
}

/// Result of a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerUpdate {
    /// The card changed and should be re-rendered.
    pub redraw: bool,
    pub cursor: Cursor,
}

// ============================================================================
// EDITOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct EditorState {
    pub style: StyleParameters,
    pub content: ContentStrings,
    pub offsets: ManualOffsets,
    pub image_transform: ImageTransform,
    pub preview_background: PreviewBackground,
    background: Option<BackgroundImage>,
    gesture: Gesture,
    fonts: FontBook,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(FontBook::new())
    }
}

impl EditorState {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            style: StyleParameters::default(),
            content: ContentStrings::default(),
            offsets: ManualOffsets::default(),
            image_transform: ImageTransform::default(),
            preview_background: PreviewBackground::default(),
            background: None,
            gesture: Gesture::Idle,
            fonts,
        }
    }

    /// Same state, rendering with `fonts`.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.background.is_some()
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn sanitized_style(&self) -> StyleParameters {
        self.style.clone().sanitized()
    }

    /// Current layout (the one both the renderer and the hit tester use).
    pub fn layout(&self) -> CardLayout {
        CardLayout::compute(
            &self.sanitized_style(),
            &self.content,
            &self.offsets.sanitized(),
            &self.fonts,
        )
    }

    pub fn render(&self) -> RgbaImage {
        let style = self.sanitized_style();
        let offsets = self.offsets.sanitized();
        let transform = self.image_transform.sanitized();
        let mut scene = Scene::new(&style, &self.content, &offsets);
        if let Some(image) = &self.background {
            scene = scene.with_background(image, &transform);
        }
        render_card(&scene, &self.fonts)
    }

    pub fn export_png(&self) -> Result<Vec<u8>, QuoteCardError> {
        crate::render::encode_png(&self.render())
    }

    /// `<slug>.png` derived from the first quote.
    pub fn export_filename(&self) -> String {
        format!("{}.png", export::filename_stem(&self.content.quote1))
    }

    // ------------------------------------------------------------------------
    // Pointer interaction
    // ------------------------------------------------------------------------

    pub fn hit_test(&self, x: f32, y: f32) -> Option<Element> {
        self.layout().hit_test(x, y)
    }

    fn hover_cursor(&self, x: f32, y: f32) -> Cursor {
        let layout = self.layout();
        if layout.hit_test(x, y).is_some() {
            Cursor::Grab
        } else if self.has_image() && layout.hit_image(x, y) {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }

    /// Start a text drag or an image pan at `(x, y)`; text takes priority.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Cursor {
        let layout = self.layout();

        if let Some(element) = layout.hit_test(x, y) {
            log::debug!("Dragging {} from y={}", element, y);
            self.gesture = Gesture::DraggingText { element, last_y: y };
            return Cursor::Grabbing;
        }

        if self.has_image() && layout.hit_image(x, y) {
            self.gesture = Gesture::PanningImage {
                last_x: x,
                last_y: y,
            };
            return Cursor::Move;
        }

        Cursor::Default
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> PointerUpdate {
        match self.gesture {
            Gesture::Idle => PointerUpdate {
                redraw: false,
                cursor: self.hover_cursor(x, y),
            },
            Gesture::DraggingText { element, last_y } => {
                let dy = y - last_y;
                let offset = match element {
                    Element::Quote1 => &mut self.offsets.quote1_offset,
                    Element::Quote2 => &mut self.offsets.quote2_offset,
                    Element::Author => &mut self.offsets.author_offset,
                    Element::Divider1 => &mut self.offsets.divider1_offset,
                };
                *offset += dy;
                self.gesture = Gesture::DraggingText { element, last_y: y };
                PointerUpdate {
                    redraw: true,
                    cursor: Cursor::Grabbing,
                }
            }
            Gesture::PanningImage { last_x, last_y } => {
                self.image_transform.pan_x += x - last_x;
                self.image_transform.pan_y += y - last_y;
                self.gesture = Gesture::PanningImage {
                    last_x: x,
                    last_y: y,
                };
                PointerUpdate {
                    redraw: true,
                    cursor: Cursor::Move,
                }
            }
            Gesture::Resizing {
                origin_x,
                origin_y,
                start_width,
                start_height,
            } => {
                let resize = |start: u32, delta: f32| {
                    (start as f32 + delta)
                        .round()
                        .clamp(MIN_CARD_SIZE as f32, MAX_CARD_SIZE as f32) as u32
                };
                self.style.card_width = resize(start_width, x - origin_x);
                self.style.card_height = resize(start_height, y - origin_y);
                PointerUpdate {
                    redraw: true,
                    cursor: Cursor::Default,
                }
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    pub fn pointer_cancel(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Start dragging the resize handle at screen point `(x, y)`.
    pub fn begin_resize(&mut self, x: f32, y: f32) {
        let style = self.sanitized_style();
        self.gesture = Gesture::Resizing {
            origin_x: x,
            origin_y: y,
            start_width: style.card_width,
            start_height: style.card_height,
        };
    }

    /// `"W × H"` label shown while resizing.
    pub fn dimension_label(&self) -> String {
        format!("{} × {}", self.style.card_width, self.style.card_height)
    }

    // ------------------------------------------------------------------------
    // Resets
    // ------------------------------------------------------------------------

    /// Default colors, fonts and offsets; also drops the background image.
    pub fn reset_styles(&mut self) {
        self.style.reset_styles();
        self.offsets.reset();
        self.clear_background();
    }

    pub fn reset_size(&mut self) {
        self.style.reset_size();
    }

    pub fn reset_everything(&mut self) {
        self.reset_styles();
        self.reset_size();
    }

    // ------------------------------------------------------------------------
    // Background image
    // ------------------------------------------------------------------------

    /// Install `image` with a fresh transform.
    pub fn set_background(&mut self, image: BackgroundImage) {
        log::info!("Background image set ({}x{})", image.width(), image.height());
        self.background = Some(image);
        self.image_transform = ImageTransform::default();
    }

    /// Decode and install a data URL; on failure nothing changes.
    pub fn apply_data_url(&mut self, data_url: &str) -> Result<(), QuoteCardError> {
        let image = BackgroundImage::from_data_url(data_url)?;
        self.set_background(image);
        Ok(())
    }

    /// Decode and install raw image file bytes; on failure nothing changes.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), QuoteCardError> {
        let image = BackgroundImage::from_bytes(bytes)?;
        self.set_background(image);
        Ok(())
    }

    pub fn clear_background(&mut self) {
        self.background = None;
        self.image_transform = ImageTransform::default();
    }

    pub fn reset_image_position(&mut self) {
        self.image_transform.reset_position();
    }

    pub fn set_image_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.image_transform.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_image_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.image_transform.zoom = zoom.clamp(MIN_IMAGE_ZOOM, MAX_IMAGE_ZOOM);
        }
    }

    pub fn set_image_rotation(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.image_transform.rotation = degrees.clamp(0.0, MAX_IMAGE_ROTATION);
        }
    }

    pub fn increment_opacity(&mut self) {
        self.set_image_opacity(step(self.image_transform.opacity, IMAGE_OPACITY_STEP));
    }

    pub fn decrement_opacity(&mut self) {
        self.set_image_opacity(step(self.image_transform.opacity, -IMAGE_OPACITY_STEP));
    }

    pub fn increment_zoom(&mut self) {
        self.set_image_zoom(step(self.image_transform.zoom, IMAGE_ZOOM_STEP));
    }

    pub fn decrement_zoom(&mut self) {
        self.set_image_zoom(step(self.image_transform.zoom, -IMAGE_ZOOM_STEP));
    }

    // ------------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------------

    /// Snapshot for saving as a template.
    pub fn capture_settings(&self) -> TemplateSettings {
        TemplateSettings {
            style: self.style.clone(),
            offsets: self.offsets,
            image: self.image_transform,
            content: TemplateContent {
                quote1: Some(self.content.quote1.clone()),
                quote2: Some(self.content.quote2.clone()),
                author: Some(self.content.author.clone()),
            },
            background_image_data: self.background.as_ref().map(|b| b.data_url().to_string()),
            preview_bg: self.preview_background,
            enable_quote2_toggle: Some(self.style.enable_quote2),
        }
    }

    /// Restore a snapshot. The image is decoded first so a bad image
    /// leaves the editor unchanged.
    pub fn apply_settings(&mut self, settings: &TemplateSettings) -> Result<(), QuoteCardError> {
        let background = match settings.background_image_data.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(BackgroundImage::from_data_url(url)?),
            _ => None,
        };

        self.style = settings.effective_style().sanitized();
        self.offsets = settings.offsets.sanitized();
        self.image_transform = settings.image.sanitized();
        self.preview_background = settings.preview_bg;
        self.background = background;

        let content = &settings.content;
        if let Some(text) = &content.quote1 {
            self.content.quote1 = text.clone();
        }
        if let Some(text) = &content.quote2 {
            self.content.quote2 = text.clone();
        }
        if let Some(text) = &content.author {
            self.content.author = text.clone();
        }

        self.end_gesture();
        Ok(())
    }
}

/// Add `delta` and round to the step grid to avoid float drift.
fn step(value: f32, delta: f32) -> f32 {
    ((value + delta) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::encode_png;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn editor_with_quotes() -> EditorState {
        let mut editor = EditorState::default();
        editor.style.enable_quote2 = true;
        editor.content = ContentStrings::new("Primul")
            .with_quote2("Al doilea")
            .with_author("Autor");
        editor
    }

    fn image_data_url() -> String {
        let img = RgbaImage::from_pixel(8, 4, Rgba([200, 10, 10, 255]));
        crate::render::background::encode_data_url("image/png", &encode_png(&img).unwrap())
    }

    #[test]
    fn test_drag_accumulates_into_offset() {
        let mut editor = editor_with_quotes();
        let layout = editor.layout();
        let (x, y) = (layout.frame.center_x(), layout.quote1.start_y);

        assert_eq!(editor.pointer_down(x, y), Cursor::Grabbing);
        editor.pointer_move(x, y + 10.0);
        editor.pointer_move(x, y + 25.0);
        let update = editor.pointer_move(x + 100.0, y + 5.0);
        assert!(update.redraw);
        editor.pointer_up();

        assert_eq!(editor.offsets.quote1_offset, 5.0);
        assert_eq!(editor.offsets.quote2_offset, 0.0);
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_drag_divider_and_author() {
        let mut editor = editor_with_quotes();
        let layout = editor.layout();
        let x = layout.frame.center_x();

        editor.pointer_down(x, layout.divider1_y.unwrap());
        editor.pointer_move(x, layout.divider1_y.unwrap() - 7.0);
        editor.pointer_leave();

        let author_y = layout.author.as_ref().unwrap().start_y;
        editor.pointer_down(x, author_y);
        editor.pointer_move(x, author_y + 3.0);
        editor.pointer_cancel();

        assert_eq!(editor.offsets.divider1_offset, -7.0);
        assert_eq!(editor.offsets.author_offset, 3.0);
    }

    #[test]
    fn test_terminal_events_clear_gesture() {
        let mut editor = editor_with_quotes();
        let layout = editor.layout();
        let (x, y) = (layout.frame.center_x(), layout.quote1.start_y);

        for end in [EditorState::pointer_up, EditorState::pointer_leave, EditorState::pointer_cancel] {
            editor.pointer_down(x, y);
            assert!(matches!(editor.gesture(), Gesture::DraggingText { .. }));
            end(&mut editor);
            assert_eq!(editor.gesture(), Gesture::Idle);
            // Moves after the gesture ended do nothing
            let before = editor.offsets;
            assert!(!editor.pointer_move(x, y + 50.0).redraw);
            assert_eq!(editor.offsets, before);
        }
    }

    #[test]
    fn test_text_wins_over_image() {
        let mut editor = editor_with_quotes();
        editor.apply_data_url(&image_data_url()).unwrap();
        let layout = editor.layout();
        let (x, y) = (layout.frame.center_x(), layout.quote1.start_y);

        editor.pointer_down(x, y);
        assert!(matches!(editor.gesture(), Gesture::DraggingText { element: Element::Quote1, .. }));
        editor.pointer_up();

        // Empty interior area pans the image
        let (ix, iy) = (layout.frame.interior.x + 5.0, layout.frame.interior.y + 5.0);
        assert_eq!(editor.pointer_down(ix, iy), Cursor::Move);
        editor.pointer_move(ix + 12.0, iy - 4.0);
        editor.pointer_up();
        assert_eq!(editor.image_transform.pan_x, 12.0);
        assert_eq!(editor.image_transform.pan_y, -4.0);
    }

    #[test]
    fn test_no_pan_without_image() {
        let mut editor = editor_with_quotes();
        let interior = editor.layout().frame.interior;
        assert_eq!(editor.pointer_down(interior.x + 5.0, interior.y + 5.0), Cursor::Default);
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_hover_cursor() {
        let mut editor = editor_with_quotes();
        let layout = editor.layout();
        let cx = layout.frame.center_x();
        assert_eq!(editor.pointer_move(cx, layout.quote1.start_y).cursor, Cursor::Grab);
        assert_eq!(editor.pointer_move(60.0, 60.0).cursor, Cursor::Default);
        editor.apply_data_url(&image_data_url()).unwrap();
        assert_eq!(editor.pointer_move(60.0, 60.0).cursor, Cursor::Move);
        assert_eq!(Cursor::Grab.as_css(), "grab");
    }

    #[test]
    fn test_resize_clamps() {
        let mut editor = EditorState::default();
        editor.begin_resize(100.0, 100.0);
        editor.pointer_move(100.0 + 5000.0, 100.0 - 5000.0);
        assert_eq!((editor.style.card_width, editor.style.card_height), (2000, 400));
        editor.pointer_move(130.0, 90.0);
        assert_eq!((editor.style.card_width, editor.style.card_height), (1000, 1064));
        assert_eq!(editor.dimension_label(), "1000 × 1064");
        editor.pointer_up();
        assert_eq!(editor.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_reset_styles_clears_offsets_and_image() {
        let mut editor = editor_with_quotes();
        editor.apply_data_url(&image_data_url()).unwrap();
        editor.offsets.quote1_offset = 40.0;
        editor.style.bg_color = Color::BLACK;
        editor.style.card_width = 1200;

        editor.reset_styles();
        assert_eq!(editor.offsets, ManualOffsets::default());
        assert!(!editor.has_image());
        assert_eq!(editor.style.card_width, 1200);
        assert!(editor.style.enable_quote2);
        assert_eq!(editor.content.quote1, "Primul");

        editor.reset_everything();
        assert_eq!(editor.style.card_width, 970);
    }

    #[test]
    fn test_image_controls_clamp() {
        let mut editor = EditorState::default();
        editor.set_image_zoom(10.0);
        assert_eq!(editor.image_transform.zoom, 3.0);
        editor.increment_zoom();
        assert_eq!(editor.image_transform.zoom, 3.0);
        editor.set_image_zoom(1.0);
        editor.decrement_zoom();
        assert_eq!(editor.image_transform.zoom, 1.0);
        editor.increment_zoom();
        assert_eq!(editor.image_transform.zoom, 1.1);

        editor.set_image_opacity(0.98);
        editor.increment_opacity();
        assert_eq!(editor.image_transform.opacity, 1.0);
        editor.set_image_opacity(0.3);
        editor.decrement_opacity();
        assert_eq!(editor.image_transform.opacity, 0.25);

        editor.set_image_rotation(400.0);
        assert_eq!(editor.image_transform.rotation, 360.0);
        editor.set_image_rotation(f32::NAN);
        assert_eq!(editor.image_transform.rotation, 360.0);
    }

    #[test]
    fn test_apply_image_resets_transform() {
        let mut editor = EditorState::default();
        editor.image_transform = ImageTransform {
            pan_x: 9.0,
            pan_y: 9.0,
            zoom: 2.0,
            rotation: 90.0,
            opacity: 0.9,
        };
        editor.apply_data_url(&image_data_url()).unwrap();
        assert_eq!(editor.image_transform, ImageTransform::default());
    }

    #[test]
    fn test_bad_image_leaves_state_untouched() {
        let mut editor = EditorState::default();
        editor.apply_data_url(&image_data_url()).unwrap();
        editor.image_transform.zoom = 2.0;
        let before = editor.background().unwrap().data_url().to_string();

        assert!(editor.apply_data_url("data:image/png;base64,AAAA").is_err());
        assert!(editor.load_image_bytes(b"not an image").is_err());
        assert_eq!(editor.background().unwrap().data_url(), before);
        assert_eq!(editor.image_transform.zoom, 2.0);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut editor = editor_with_quotes();
        editor.apply_data_url(&image_data_url()).unwrap();
        editor.style.quote1_size = 55;
        editor.offsets.quote2_offset = -14.0;
        editor.image_transform.zoom = 1.5;
        editor.image_transform.rotation = 30.0;
        editor.preview_background = PreviewBackground::Dark;

        let json = serde_json::to_string(&editor.capture_settings()).unwrap();
        let settings: TemplateSettings = serde_json::from_str(&json).unwrap();

        let mut restored = EditorState::default();
        restored.apply_settings(&settings).unwrap();
        assert_eq!(restored.style, editor.style);
        assert_eq!(restored.content, editor.content);
        assert_eq!(restored.offsets, editor.offsets);
        assert_eq!(restored.image_transform, editor.image_transform);
        assert_eq!(restored.preview_background, PreviewBackground::Dark);
        assert_eq!(
            restored.background().map(|b| b.data_url()),
            editor.background().map(|b| b.data_url())
        );
    }

    #[test]
    fn test_apply_settings_keeps_absent_text() {
        let mut editor = editor_with_quotes();
        let mut settings = editor.capture_settings();
        settings.content = TemplateContent {
            quote1: Some("Nou".into()),
            ..Default::default()
        };
        editor.apply_settings(&settings).unwrap();
        assert_eq!(editor.content.quote1, "Nou");
        assert_eq!(editor.content.author, "Autor");
    }

    #[test]
    fn test_export_filename_and_png() {
        let mut editor = EditorState::default();
        assert_eq!(editor.export_filename(), "quote-card.png");
        editor.content.quote1 = "Hello world".into();
        assert_eq!(editor.export_filename(), "hello-world.png");
        let png = editor.export_png().unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn test_preview_background_parsing() {
        let dark: PreviewBackground = serde_json::from_str(r#""dark""#).unwrap();
        let other: PreviewBackground = serde_json::from_str(r#""sepia""#).unwrap();
        let null: PreviewBackground = serde_json::from_str("null").unwrap();
        assert_eq!(dark, PreviewBackground::Dark);
        assert_eq!(other, PreviewBackground::Light);
        assert_eq!(null, PreviewBackground::Light);
        assert_eq!(PreviewBackground::Dark.color(), Color::rgb(0x1A, 0x1A, 0x1A));
    }
}
