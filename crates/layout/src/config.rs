use serde::Deserialize;

/// Physical page size and margins, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Applied to the left and right edges.
    pub margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

impl Default for PageGeometry {
    /// A4 portrait with 50pt margins.
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 50.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
        }
    }
}

impl PageGeometry {
    /// Usable width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Usable height between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        self.height - self.top_margin - self.bottom_margin
    }

    /// Cursor position at the top of a fresh page.
    pub fn top(&self) -> f32 {
        self.height - self.top_margin
    }
}

/// Font sizes used by the report renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeScale;

impl TypeScale {
    pub const BODY: f32 = 12.0;
    pub const SMALL: f32 = 10.0;
    pub const TITLE: f32 = 20.0;
    /// Extra vertical space added below every line on top of the font size.
    pub const LINE_GAP: f32 = 6.0;

    /// Heading size for levels 1..=3; deeper levels collapse to level 3.
    pub fn heading(level: u8) -> f32 {
        match level {
            0 | 1 => 18.0,
            2 => 16.0,
            _ => 14.0,
        }
    }

    /// Vertical advance of one line at `size`.
    pub fn line_height(size: f32) -> f32 {
        size + Self::LINE_GAP
    }
}
