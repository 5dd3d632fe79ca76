//! File naming helpers for saved results.

use std::path::Path;

/// Name used when the caller provides none.
pub const DEFAULT_PDF_NAME: &str = "document.pdf";

/// Name used for converted images when no usable stem exists.
pub const DEFAULT_IMAGE_PDF_NAME: &str = "image.pdf";

/// Default blank names to `document.pdf` and ensure a `.pdf` suffix.
pub fn normalize_pdf_filename(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return DEFAULT_PDF_NAME.to_string();
    }
    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// `photo.jpg` becomes `photo.pdf`. Only the last extension is dropped.
pub fn image_output_name(file_name: &str) -> String {
    let name = Path::new(file_name.trim())
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem).trim();
    if stem.is_empty() {
        DEFAULT_IMAGE_PDF_NAME.to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Name of the `index`-th (0-based) split output.
pub fn split_part_name(base: &str, index: usize) -> String {
    format!("{base}_part{}.pdf", index + 1)
}

/// Human-readable byte count with base-1024 units and up to two decimals.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pdf_filename() {
        assert_eq!(normalize_pdf_filename(""), "document.pdf");
        assert_eq!(normalize_pdf_filename("   "), "document.pdf");
        assert_eq!(normalize_pdf_filename("report"), "report.pdf");
        assert_eq!(normalize_pdf_filename("report.PDF"), "report.PDF");
        assert_eq!(normalize_pdf_filename("archive.pdf.bak"), "archive.pdf.bak.pdf");
    }

    #[test]
    fn test_image_output_name() {
        assert_eq!(image_output_name("photo.jpg"), "photo.pdf");
        assert_eq!(image_output_name("scan.final.png"), "scan.final.pdf");
        assert_eq!(image_output_name(""), "image.pdf");
        assert_eq!(image_output_name(".png"), "image.pdf");
        assert_eq!(image_output_name("dir/photo"), "photo.pdf");
    }

    #[test]
    fn test_split_part_name() {
        assert_eq!(split_part_name("report", 0), "report_part1.pdf");
        assert_eq!(split_part_name("report", 9), "report_part10.pdf");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }
}
