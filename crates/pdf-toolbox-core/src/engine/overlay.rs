//! Placement geometry for overlay text.
//!
//! Both overlay kinds reduce to a [`TextRun`] per page: a string, a baseline
//! origin, a rotation and styling. [`Overlay::place`] computes it from the
//! page geometry alone, so the same options always yield the same run for a
//! given page size.

use crate::options::{
    HorizontalAnchor, PageNumberOptions, VerticalAnchor, WatermarkOptions, WatermarkPlacement,
};
use crate::pdf::{PageIndex, PageSize, StandardFont, TextRun};

/// What a page is being decorated with.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Watermark(WatermarkOptions),
    PageNumber(PageNumberOptions),
}

/// Where a page sits in its document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub size: PageSize,
    pub index: PageIndex,
    pub total: usize,
}

impl Overlay {
    /// Font the overlay text is drawn with.
    pub const fn font(&self) -> StandardFont {
        match self {
            Self::Watermark(options) => options.font,
            Self::PageNumber(options) => options.font,
        }
    }

    /// Compute the text run for one page.
    ///
    /// `measure` returns the width of a string at a font size, in points.
    pub fn place<F>(&self, page: &PageGeometry, measure: F) -> TextRun
    where
        F: Fn(&str, f32) -> f32,
    {
        match self {
            Self::Watermark(options) => place_watermark(options, page.size),
            Self::PageNumber(options) => place_page_number(options, page, measure),
        }
    }
}

fn place_watermark(options: &WatermarkOptions, size: PageSize) -> TextRun {
    let rotation_degrees = match options.placement {
        WatermarkPlacement::Diagonal => options.rotation_degrees,
        WatermarkPlacement::Center => 0.0,
    };
    TextRun {
        text: options.text.clone(),
        x: size.width / 2.0 + options.base_offset_x + options.offset_x,
        y: size.height / 2.0 + options.base_offset_y + options.offset_y,
        font_size: options.font_size,
        color: options.color,
        rotation_degrees,
        opacity: options.opacity,
    }
}

fn place_page_number<F>(options: &PageNumberOptions, page: &PageGeometry, measure: F) -> TextRun
where
    F: Fn(&str, f32) -> f32,
{
    let offset = i64::try_from(page.index.as_usize()).unwrap_or(i64::MAX);
    let text = page_label(&options.template, options.start_at.saturating_add(offset), page.total);
    let text_width = measure(&text, options.font_size);
    let PageSize { width, height } = page.size;

    let x = match options.position.horizontal {
        HorizontalAnchor::Right => width - options.margin_x - text_width,
        HorizontalAnchor::Center => (width - text_width) / 2.0,
        HorizontalAnchor::Left => options.margin_x,
    };
    let y = match options.position.vertical {
        VerticalAnchor::Top => height - options.margin_y - options.font_size,
        VerticalAnchor::Middle => (height - options.font_size) / 2.0,
        VerticalAnchor::Bottom => options.margin_y,
    };

    TextRun {
        text,
        x,
        y,
        font_size: options.font_size,
        color: options.color,
        rotation_degrees: 0.0,
        opacity: options.opacity,
    }
}

/// Fill a page-number template.
///
/// Only the first `{n}` and the first `{total}` are replaced.
pub fn page_label(template: &str, number: i64, total: usize) -> String {
    template
        .replacen("{n}", &number.to_string(), 1)
        .replacen("{total}", &total.to_string(), 1)
}
