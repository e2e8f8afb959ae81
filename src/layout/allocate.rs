//! Vertical area allocation between the two quote blocks.
//!
//! With a single quote the whole quote area is used and the block is
//! centered in it. With two quotes, the area minus the gaps around the
//! divider is split in proportion to each block's own height, so a quote
//! with more lines gets more room instead of a fixed 50/50 split.
//!
//! ```text
//!  area.top ─┬──────────────────────┐
//!            │  quote 1 (a1)        │  a1 = adjustable × h1 / (h1 + h2)
//!            ├──────────────────────┤
//!            │  gap before (30)     │
//!  divider ──┼──────────────────────┤
//!            │  gap after (60)      │
//!            ├──────────────────────┤
//!            │  quote 2 (a2)        │  a2 = adjustable − a1
//!  area.bot ─┴──────────────────────┘
//! ```

use crate::style::ManualOffsets;

pub const QUOTE_TOP_PADDING: f32 = 60.0;
pub const QUOTE_BOTTOM_PADDING: f32 = 60.0;
pub const DIVIDER_GAP_BEFORE: f32 = 30.0;
pub const DIVIDER_GAP_AFTER: f32 = 60.0;

/// Total vertical extent of a wrapped block: the first line's font size
/// plus one line advance per additional line.
pub fn block_height(line_count: usize, font_size: f32, line_height: f32) -> f32 {
    if line_count == 0 {
        0.0
    } else {
        font_size + (line_count - 1) as f32 * font_size * line_height
    }
}

/// The vertical span available to the quote blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteArea {
    pub top: f32,
    pub bottom: f32,
}

impl QuoteArea {
    /// Build an area; a bottom above the top collapses to an empty span.
    pub fn new(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom: bottom.max(top),
        }
    }

    pub fn span(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Vertical slot given to one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSlot {
    pub area_top: f32,
    pub area_height: f32,
    /// Baseline of the block's first line (centered in the slot plus offset).
    pub start_y: f32,
}

/// Result of splitting the quote area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub quote1: BlockSlot,
    pub quote2: Option<BlockSlot>,
    /// Divider between the quotes (only with a second quote), offset applied.
    pub divider1_y: Option<f32>,
}

/// Split `area` between quote 1 and (optionally) quote 2.
///
/// `quote2_height` is `None` when the second quote is disabled or empty.
pub fn allocate(
    area: QuoteArea,
    quote1_height: f32,
    quote2_height: Option<f32>,
    offsets: &ManualOffsets,
) -> Allocation {
    let Some(quote2_height) = quote2_height else {
        let area_height = area.span().max(0.0);
        return Allocation {
            quote1: BlockSlot {
                area_top: area.top,
                area_height,
                start_y: area.top + (area_height - quote1_height) / 2.0 + offsets.quote1_offset,
            },
            quote2: None,
            divider1_y: None,
        };
    };

    let adjustable = (area.span() - DIVIDER_GAP_BEFORE - DIVIDER_GAP_AFTER).max(0.0);
    let total = (quote1_height + quote2_height).max(1.0);
    let quote1_area = adjustable * (quote1_height / total);
    let quote2_area = adjustable - quote1_area;

    let base_divider = area.top + quote1_area + DIVIDER_GAP_BEFORE;
    let quote2_top = base_divider + DIVIDER_GAP_AFTER;

    Allocation {
        quote1: BlockSlot {
            area_top: area.top,
            area_height: quote1_area,
            start_y: area.top + (quote1_area - quote1_height) / 2.0 + offsets.quote1_offset,
        },
        quote2: Some(BlockSlot {
            area_top: quote2_top,
            area_height: quote2_area,
            start_y: quote2_top + (quote2_area - quote2_height) / 2.0 + offsets.quote2_offset,
        }),
        divider1_y: Some(base_divider + offsets.divider1_offset),
    }
}
