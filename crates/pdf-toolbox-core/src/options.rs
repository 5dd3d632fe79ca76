//! Option records for overlays, image conversion and compression.
//!
//! Every field has a default and every record deserializes field by field,
//! so a partially specified config or request never fails for a missing key.

use serde::{Deserialize, Serialize};

use crate::pdf::StandardFont;

/// RGB color, each channel in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
}

impl RgbColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn dark_gray() -> Self {
        Self::new(0.2, 0.2, 0.2)
    }

    pub const fn dark_red() -> Self {
        Self::new(0.8, 0.0, 0.0)
    }

    pub const fn blue() -> Self {
        Self::new(0.0, 0.0, 0.8)
    }

    /// Look up a named preset such as `dark-red` or `grey`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "black" => Some(Self::black()),
            "gray" | "grey" | "darkgray" | "dark_gray" | "dark-gray" => Some(Self::dark_gray()),
            "darkred" | "dark_red" | "dark-red" | "red" => Some(Self::dark_red()),
            "blue" => Some(Self::blue()),
            _ => None,
        }
    }

    /// Channels clamped to 0.0-1.0, as written into content streams.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::black()
    }
}

// =============================================================================
// Watermark
// =============================================================================

/// How the watermark text is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkPlacement {
    /// Horizontal text, rotation ignored
    Center,
    /// Text rotated by `rotation_degrees`
    #[default]
    Diagonal,
}

/// Text watermark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkOptions {
    pub text: String,
    pub font: StandardFont,
    pub font_size: f32,
    /// Fill and stroke alpha; not clamped here, the provider writes it as given
    pub opacity: f32,
    pub rotation_degrees: f32,
    pub color: RgbColor,
    pub placement: WatermarkPlacement,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Fixed horizontal shift from the page center applied before `offset_x`
    pub base_offset_x: f32,
    /// Fixed vertical shift from the page center applied before `offset_y`
    pub base_offset_y: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: "CONFIDENTIAL".to_string(),
            font: StandardFont::HelveticaBold,
            font_size: 48.0,
            opacity: 0.15,
            rotation_degrees: 45.0,
            color: RgbColor::dark_gray(),
            placement: WatermarkPlacement::Diagonal,
            offset_x: 0.0,
            offset_y: 0.0,
            base_offset_x: 50.0,
            base_offset_y: -100.0,
        }
    }
}

// =============================================================================
// Page numbers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

/// Where a page-number label sits, one of nine compass-style positions.
///
/// Parsed leniently by substring: any text containing `right` anchors right,
/// `center` anchors centered, anything else anchors left. Vertically `top` and
/// `middle` are recognized, anything else anchors at the bottom. Parsing never
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PagePosition {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl PagePosition {
    pub const fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self { horizontal, vertical }
    }

    pub fn parse(position: &str) -> Self {
        let position = position.to_lowercase();
        let horizontal = if position.contains("right") {
            HorizontalAnchor::Right
        } else if position.contains("center") {
            HorizontalAnchor::Center
        } else {
            HorizontalAnchor::Left
        };
        let vertical = if position.contains("top") {
            VerticalAnchor::Top
        } else if position.contains("middle") {
            VerticalAnchor::Middle
        } else {
            VerticalAnchor::Bottom
        };
        Self { horizontal, vertical }
    }
}

impl Default for PagePosition {
    fn default() -> Self {
        Self::new(VerticalAnchor::Bottom, HorizontalAnchor::Right)
    }
}

impl From<String> for PagePosition {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for PagePosition {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<PagePosition> for String {
    fn from(p: PagePosition) -> Self {
        p.to_string()
    }
}

impl std::fmt::Display for PagePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Middle => "middle",
            VerticalAnchor::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        };
        write!(f, "{v}-{h}")
    }
}

/// Page-number label configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageNumberOptions {
    pub font: StandardFont,
    pub font_size: f32,
    pub opacity: f32,
    pub color: RgbColor,
    pub margin_x: f32,
    pub margin_y: f32,
    pub position: PagePosition,
    /// Label template; the first `{n}` and the first `{total}` are substituted
    pub template: String,
    pub start_at: i64,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            font: StandardFont::Helvetica,
            font_size: 12.0,
            opacity: 0.9,
            color: RgbColor::black(),
            margin_x: 40.0,
            margin_y: 25.0,
            position: PagePosition::default(),
            template: "{n}/{total}".to_string(),
            start_at: 1,
        }
    }
}

// =============================================================================
// Image to PDF
// =============================================================================

/// Target page size for image conversion.
///
/// Deserialized through [`PageSizing::parse`], so `"original"`,
/// `"fit-to-image"` or any other value than `"a4"` sizes the page to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageSizing {
    /// Fixed ISO A4 portrait page
    #[default]
    A4,
    /// Page fitted to the image plus margins
    Original,
}

impl PageSizing {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("a4") {
            Self::A4
        } else {
            Self::Original
        }
    }
}

impl From<String> for PageSizing {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<PageSizing> for String {
    fn from(sizing: PageSizing) -> Self {
        match sizing {
            PageSizing::A4 => "a4".to_string(),
            PageSizing::Original => "original".to_string(),
        }
    }
}

/// How the image is scaled into the available area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Whole image visible, letterboxed
    #[default]
    Contain,
    /// Area fully covered, overflow clipped
    Cover,
}

impl FitMode {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("cover") {
            Self::Cover
        } else {
            Self::Contain
        }
    }
}

/// Largest accepted image margin, in millimetres.
pub const MAX_IMAGE_MARGIN_MM: f32 = 30.0;

/// Raster image placement configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePlacementOptions {
    pub page: PageSizing,
    /// Symmetric margin in millimetres (0-30)
    pub margin_mm: f32,
    pub fit: FitMode,
}

impl Default for ImagePlacementOptions {
    fn default() -> Self {
        Self {
            page: PageSizing::A4,
            margin_mm: 10.0,
            fit: FitMode::Contain,
        }
    }
}

// =============================================================================
// Compression
// =============================================================================

/// Lossless structural compression configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionOptions {
    /// Collect before/after statistics
    pub collect_stats: bool,
}
