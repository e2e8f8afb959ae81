//! Full card geometry: frame, wrapped text blocks, divider and author positions.
//!
//! ```text
//!  ┌──────────────────────────────────────┐  background (bgColor)
//!  │  ┌ red ─ yellow ─ blue borders ────┐  │  margin 38, 5px each
//!  │  │ interior (cardColor)            │  │
//!  │  │   padding = inset + 40          │  │
//!  │  │      quote 1 (centered)         │  │
//!  │  │      ──── divider 1 ────        │  │
//!  │  │      quote 2 (centered)         │  │
//!  │  │      ──── divider 2 ────        │  │
//!  │  │      author                     │  │
//!  │  └─────────────────────────────────┘  │
//!  └──────────────────────────────────────┘
//! ```

use super::Rect;
use super::allocate::{QUOTE_BOTTOM_PADDING, QUOTE_TOP_PADDING, QuoteArea, allocate, block_height};
use super::wrap::wrap_text;
use crate::font::{ASCENT_RATIO, DESCENT_RATIO, FontBook, Typeface};
use crate::style::{Color, ContentStrings, ManualOffsets, StyleParameters, TextRole};

pub const MARGIN_FROM_EDGE: f32 = 38.0;
pub const BORDER_WIDTH: f32 = 5.0;
pub const INNER_PADDING: f32 = 40.0;
pub const DIVIDER_WIDTH: f32 = 350.0;
pub const DIVIDER_THICKNESS: f32 = 3.0;
/// Gap between the author divider and the author's cap height.
pub const AUTHOR_DIVIDER_GAP: f32 = 10.0;
/// The author baseline sits this far below the content bottom.
pub const AUTHOR_BASELINE_DROP: f32 = 8.0;
/// Space kept under the quotes when there is no author.
const NO_AUTHOR_BOTTOM_GAP: f32 = 40.0;

/// Border colors, outermost first.
pub const BORDER_COLORS: [Color; 3] = [
    Color::rgb(0xFF, 0x00, 0x00),
    Color::rgb(0xFF, 0xE5, 0x00),
    Color::rgb(0x02, 0x87, 0xFF),
];

// ============================================================================
// FRAME
// ============================================================================

/// Card frame: canvas size, border insets and the padded content column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub borders: bool,
    /// Distance from the canvas edge to the card interior.
    pub inset: f32,
    /// Distance from the canvas edge to the text column.
    pub padding: f32,
    pub interior: Rect,
    pub content: Rect,
}

impl Frame {
    pub fn new(style: &StyleParameters) -> Self {
        let width = style.card_width as f32;
        let height = style.card_height as f32;
        let borders = style.enable_colored_borders;

        let inset = if borders {
            MARGIN_FROM_EDGE + BORDER_COLORS.len() as f32 * BORDER_WIDTH
        } else {
            MARGIN_FROM_EDGE
        };
        let padding = inset + INNER_PADDING;

        Self {
            width,
            height,
            borders,
            inset,
            padding,
            interior: Rect::from_edges(inset, inset, width - inset, height - inset),
            content: Rect::from_edges(padding, padding, width - padding, height - padding),
        }
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn content_width(&self) -> f32 {
        self.content.width
    }

    /// Border bands (outermost first) as filled rectangles outlines.
    ///
    /// Each entry is the outer rectangle of a band `BORDER_WIDTH` thick.
    pub fn border_bands(&self) -> Vec<(Rect, Color)> {
        if !self.borders {
            return Vec::new();
        }
        BORDER_COLORS
            .iter()
            .enumerate()
            .map(|(i, color)| {
                let offset = MARGIN_FROM_EDGE + i as f32 * BORDER_WIDTH;
                (
                    Rect::from_edges(offset, offset, self.width - offset, self.height - offset),
                    *color,
                )
            })
            .collect()
    }

    /// Horizontal extent of a centered divider.
    pub fn divider_span(&self) -> (f32, f32) {
        let half = DIVIDER_WIDTH / 2.0;
        (self.center_x() - half, self.center_x() + half)
    }
}

// ============================================================================
// TEXT BLOCKS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

/// A wrapped, positioned block of centered text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub role: TextRole,
    pub lines: Vec<TextLine>,
    pub font_size: f32,
    pub bold: bool,
    pub color: Color,
    /// Distance between consecutive baselines.
    pub advance: f32,
    /// Baseline of the first line.
    pub start_y: f32,
    pub block_height: f32,
    center_x: f32,
    column: (f32, f32),
}

impl TextBlock {
    fn build(
        role: TextRole,
        lines: Vec<String>,
        face: &dyn Typeface,
        style: &StyleParameters,
        frame: &Frame,
    ) -> Self {
        let text_style = style.text_style(role);
        let bold = text_style.weight.is_bold();
        let size = text_style.size;
        let lines: Vec<TextLine> = lines
            .into_iter()
            .map(|text| TextLine {
                width: face.measure(&text, size, bold),
                text,
            })
            .collect();

        Self {
            role,
            block_height: block_height(lines.len(), size, text_style.line_height),
            lines,
            font_size: size,
            bold,
            color: text_style.color,
            advance: size * text_style.line_height,
            start_y: 0.0,
            center_x: frame.center_x(),
            column: (frame.content.x, frame.content.right()),
        }
    }

    /// Each line paired with its baseline and left edge (lines are centered).
    pub fn placed_lines(&self) -> impl Iterator<Item = (&TextLine, f32, f32)> {
        self.lines.iter().enumerate().map(|(i, line)| {
            let baseline = self.start_y + i as f32 * self.advance;
            (line, self.center_x - line.width / 2.0, baseline)
        })
    }

    pub fn widest_line(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }

    /// Region where this block's glyphs are painted and where it is hit.
    ///
    /// Vertically `[start_y - 0.75·size, start_y + block_height + 0.25·size]`
    /// (the author uses its single line, `[baseline - 0.75·size, baseline + 0.25·size]`);
    /// horizontally the content column, widened to fit any overflowing line.
    pub fn hit_rect(&self) -> Option<Rect> {
        if self.lines.is_empty() {
            return None;
        }
        // The author line is only hit on its own glyph band
        let extent = match self.role {
            TextRole::Author => 0.0,
            _ => self.block_height,
        };
        let half = self.widest_line() / 2.0;
        Some(Rect::from_edges(
            self.column.0.min(self.center_x - half),
            self.start_y - ASCENT_RATIO * self.font_size,
            self.column.1.max(self.center_x + half),
            self.start_y + extent + DESCENT_RATIO * self.font_size,
        ))
    }
}

// ============================================================================
// CARD LAYOUT
// ============================================================================

/// Everything needed to paint or hit-test one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub frame: Frame,
    pub quote1: TextBlock,
    pub quote2: Option<TextBlock>,
    pub author: Option<TextBlock>,
    /// Divider between the quotes (only with a second quote).
    pub divider1_y: Option<f32>,
    /// Divider above the author (only with an author).
    pub divider2_y: Option<f32>,
    pub show_dividers: bool,
    pub divider_color: Color,
}

impl CardLayout {
    /// Lay out a card. `style` is expected to be [`sanitized`](StyleParameters::sanitized).
    pub fn compute(
        style: &StyleParameters,
        content: &ContentStrings,
        offsets: &ManualOffsets,
        fonts: &FontBook,
    ) -> Self {
        let frame = Frame::new(style);
        let face = fonts.resolve(&style.font_family);
        let max_width = frame.content_width();

        let wrap = |role: TextRole, text: &str| {
            let text_style = style.text_style(role);
            let bold = text_style.weight.is_bold();
            wrap_text(text, max_width, |s| face.measure(s, text_style.size, bold))
        };

        let mut quote1 = TextBlock::build(
            TextRole::Quote1,
            wrap(TextRole::Quote1, &content.quote1),
            face,
            style,
            &frame,
        );

        let mut quote2 = if style.enable_quote2 && !content.quote2.trim().is_empty() {
            let block = TextBlock::build(
                TextRole::Quote2,
                wrap(TextRole::Quote2, &content.quote2),
                face,
                style,
                &frame,
            );
            (!block.lines.is_empty()).then_some(block)
        } else {
            None
        };

        let author_size = style.author_size as f32;
        let content_bottom = frame.height - frame.padding;

        let (author, divider2_y) = if content.has_author() {
            let mut block = TextBlock::build(
                TextRole::Author,
                vec![content.author.clone()],
                face,
                style,
                &frame,
            );
            block.start_y = content_bottom + AUTHOR_BASELINE_DROP + offsets.author_offset;
            let divider = content_bottom - author_size - AUTHOR_DIVIDER_GAP;
            (Some(block), Some(divider))
        } else {
            (None, None)
        };

        let quote_top = frame.padding + QUOTE_TOP_PADDING;
        let base = divider2_y.unwrap_or(content_bottom - NO_AUTHOR_BOTTOM_GAP);
        let area = QuoteArea::new(quote_top, base - QUOTE_BOTTOM_PADDING);

        let allocation = allocate(
            area,
            quote1.block_height,
            quote2.as_ref().map(|q| q.block_height),
            offsets,
        );
        quote1.start_y = allocation.quote1.start_y;
        if let (Some(block), Some(slot)) = (quote2.as_mut(), allocation.quote2) {
            block.start_y = slot.start_y;
        }

        log::trace!(
            "Layout {}x{}: quote1 {} lines, quote2 {:?} lines, author {}",
            frame.width,
            frame.height,
            quote1.lines.len(),
            quote2.as_ref().map(|q| q.lines.len()),
            author.is_some()
        );

        Self {
            frame,
            quote1,
            quote2,
            author,
            divider1_y: allocation.divider1_y,
            divider2_y,
            show_dividers: style.show_dividers,
            divider_color: style.divider_color,
        }
    }

    /// Text blocks in paint order.
    pub fn blocks(&self) -> impl Iterator<Item = &TextBlock> {
        std::iter::once(&self.quote1)
            .chain(self.quote2.as_ref())
            .chain(self.author.as_ref())
    }

    /// Divider bars to paint (empty when dividers are hidden).
    pub fn divider_rects(&self) -> Vec<Rect> {
        if !self.show_dividers {
            return Vec::new();
        }
        let (left, right) = self.frame.divider_span();
        [self.divider1_y, self.divider2_y]
            .into_iter()
            .flatten()
            .map(|y| {
                let half = DIVIDER_THICKNESS / 2.0;
                Rect::from_edges(left, y - half, right, y + half)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layout(style: &StyleParameters, content: &ContentStrings) -> CardLayout {
        CardLayout::compute(style, content, &ManualOffsets::default(), &FontBook::new())
    }

    #[test]
    fn test_frame_insets() {
        let style = StyleParameters::default();
        let frame = Frame::new(&style);
        assert_eq!(frame.inset, 53.0);
        assert_eq!(frame.padding, 93.0);
        assert_eq!(frame.content_width(), 970.0 - 186.0);
        assert_eq!(frame.interior, Rect::from_edges(53.0, 53.0, 917.0, 1021.0));

        let plain = Frame::new(&StyleParameters {
            enable_colored_borders: false,
            ..Default::default()
        });
        assert_eq!(plain.inset, 38.0);
        assert_eq!(plain.padding, 78.0);
        assert!(plain.border_bands().is_empty());
    }

    #[test]
    fn test_border_bands_step_inward() {
        let frame = Frame::new(&StyleParameters::default());
        let bands = frame.border_bands();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].0.x, 38.0);
        assert_eq!(bands[1].0.x, 43.0);
        assert_eq!(bands[2].0.x, 48.0);
        assert_eq!(bands[0].1, Color::rgb(0xFF, 0, 0));
        assert_eq!(bands[2].1, Color::rgb(0x02, 0x87, 0xFF));
    }

    #[test]
    fn test_hello_world_single_line_centered() {
        let style = StyleParameters::default();
        let card = layout(&style, &ContentStrings::new("Hello world"));

        assert_eq!(card.quote1.lines.len(), 1);
        assert_eq!(card.quote1.block_height, 70.0);
        assert!(card.quote2.is_none());
        assert!(card.author.is_none());
        assert!(card.divider1_y.is_none());
        assert!(card.divider2_y.is_none());

        // area: top 93 + 60, bottom (1074 - 93 - 40) - 60
        let (top, bottom) = (153.0, 881.0);
        let expected = top + ((bottom - top) - 70.0) / 2.0;
        assert!((card.quote1.start_y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_author_and_second_divider() {
        let style = StyleParameters::default();
        let content = ContentStrings::new("Quote").with_author("Ion Creangă");
        let card = layout(&style, &content);

        let author = card.author.as_ref().unwrap();
        assert_eq!(author.start_y, 1074.0 - 93.0 + 8.0);
        assert_eq!(card.divider2_y, Some(1074.0 - 93.0 - 36.0 - 10.0));
        assert_eq!(card.divider_rects().len(), 1);
        assert_eq!(card.divider_rects()[0].width, DIVIDER_WIDTH);
        // The bar is centered on the divider line
        assert_eq!(card.divider_rects()[0].y, 935.0 - 1.5);
        assert_eq!(card.divider_rects()[0].bottom(), 935.0 + 1.5);
    }

    #[test]
    fn test_blank_author_is_ignored() {
        let card = layout(
            &StyleParameters::default(),
            &ContentStrings::new("Quote").with_author("   "),
        );
        assert!(card.author.is_none());
        assert!(card.divider2_y.is_none());
    }

    #[test]
    fn test_quote2_requires_toggle_and_text() {
        let content = ContentStrings::new("First").with_quote2("Second");
        let off = layout(&StyleParameters::default(), &content);
        assert!(off.quote2.is_none());

        let style = StyleParameters {
            enable_quote2: true,
            ..Default::default()
        };
        let on = layout(&style, &content);
        assert!(on.quote2.is_some());
        assert!(on.divider1_y.is_some());

        let blank = layout(&style, &ContentStrings::new("First").with_quote2("  \n "));
        assert!(blank.quote2.is_none());
        assert!(blank.divider1_y.is_none());
    }

    #[test]
    fn test_hidden_dividers_still_have_positions() {
        let style = StyleParameters {
            enable_quote2: true,
            show_dividers: false,
            ..Default::default()
        };
        let content = ContentStrings::new("A").with_quote2("B").with_author("C");
        let card = layout(&style, &content);
        assert!(card.divider1_y.is_some());
        assert!(card.divider_rects().is_empty());
    }

    #[test]
    fn test_lines_wrapped_to_content_width() {
        let style = StyleParameters::default();
        let text = "Credința și adevărul sunt lumina care ne călăuzește prin istorie";
        let card = layout(&style, &ContentStrings::new(text));
        assert!(card.quote1.lines.len() > 1);
        for line in &card.quote1.lines {
            assert!(line.width <= card.frame.content_width() || !line.text.contains(' '));
        }
    }

    #[test]
    fn test_hit_rect_widens_for_overflowing_word() {
        let style = StyleParameters {
            quote1_size: 200,
            ..Default::default()
        };
        let card = layout(&style, &ContentStrings::new("Nemaipomenit"));
        let rect = card.quote1.hit_rect().unwrap();
        assert!(card.quote1.widest_line() > card.frame.content_width());
        assert!(rect.width >= card.quote1.widest_line());
    }

    #[test]
    fn test_empty_quote_has_no_hit_rect() {
        let card = layout(&StyleParameters::default(), &ContentStrings::default());
        assert!(card.quote1.lines.is_empty());
        assert!(card.quote1.hit_rect().is_none());
    }
}
