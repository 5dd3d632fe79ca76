//! Page size and placement for single-image documents.

use crate::error::{Error, Result};
use crate::options::{FitMode, ImagePlacementOptions, MAX_IMAGE_MARGIN_MM, PageSizing};
use crate::pdf::{ImagePlacement, PageSize, Rect};

/// Points per millimetre.
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Check a margin in millimetres and convert it to points.
pub fn validate_margin(margin_mm: f32) -> Result<f32> {
    if !(0.0..=MAX_IMAGE_MARGIN_MM).contains(&margin_mm) {
        return Err(Error::InvalidMargin {
            margin_mm,
            reason: format!("must be between 0 and {MAX_IMAGE_MARGIN_MM}mm"),
        });
    }
    Ok(mm_to_pt(margin_mm))
}

/// Computed page and image geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageLayout {
    pub page: PageSize,
    pub placement: ImagePlacement,
}

/// Lay out an image of `width x height` pixels, one pixel per point.
pub fn layout_image(width: u32, height: u32, options: &ImagePlacementOptions) -> Result<ImageLayout> {
    let margin = validate_margin(options.margin_mm)?;
    if width == 0 || height == 0 {
        return Err(Error::ImageDecode(format!("image has no pixels ({width}x{height})")));
    }

    #[allow(clippy::cast_precision_loss)]
    let (img_w, img_h) = (width as f32, height as f32);

    let page = match options.page {
        PageSizing::A4 => PageSize::A4,
        PageSizing::Original => PageSize::new(img_w + 2.0 * margin, img_h + 2.0 * margin),
    };

    let avail_w = page.width - 2.0 * margin;
    let avail_h = page.height - 2.0 * margin;
    if avail_w <= 0.0 || avail_h <= 0.0 {
        return Err(Error::InvalidMargin {
            margin_mm: options.margin_mm,
            reason: "no drawable area left on the page".to_string(),
        });
    }

    let (sx, sy) = (avail_w / img_w, avail_h / img_h);
    let scale = match options.fit {
        FitMode::Contain => sx.min(sy),
        FitMode::Cover => sx.max(sy),
    };

    let (draw_w, draw_h) = (img_w * scale, img_h * scale);
    let rect = Rect {
        x: margin + (avail_w - draw_w) / 2.0,
        y: margin + (avail_h - draw_h) / 2.0,
        width: draw_w,
        height: draw_h,
    };
    let clip = match options.fit {
        FitMode::Contain => None,
        FitMode::Cover => Some(Rect {
            x: margin,
            y: margin,
            width: avail_w,
            height: avail_h,
        }),
    };

    Ok(ImageLayout {
        page,
        placement: ImagePlacement { rect, clip },
    })
}
