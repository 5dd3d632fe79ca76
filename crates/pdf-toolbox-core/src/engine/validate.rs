//! Cheap input guards run before any provider call.

use crate::error::{Error, Result};

/// Every PDF file starts with this signature.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Check that a buffer is non-empty and starts with `%PDF-`.
///
/// This is not a structural validation. A buffer that passes may still fail
/// to parse later.
pub fn validate_pdf_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(Error::NotAPdf);
    }
    Ok(())
}

/// Boolean form of [`validate_pdf_bytes`].
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    validate_pdf_bytes(bytes).is_ok()
}
