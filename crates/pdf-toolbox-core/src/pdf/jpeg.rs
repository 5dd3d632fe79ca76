//! JPEG header scanning.
//!
//! JPEG data is embedded as-is with `DCTDecode`, so the image dictionary has
//! to be filled from the file's own markers: size and component count from
//! the start-of-frame segment, and the Adobe APP14 segment for files whose
//! CMYK samples are stored inverted.

use crate::error::{Error, Result};

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP14: u8 = 0xEE;

/// Frame information read from a JPEG's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegHeader {
    pub width: u32,
    pub height: u32,
    /// Number of colour components: 1 (gray), 3 (YCbCr/RGB) or 4 (CMYK/YCCK)
    pub components: u8,
    /// An Adobe APP14 segment precedes the frame
    pub adobe: bool,
}

impl JpegHeader {
    /// Scan markers up to the first start-of-frame segment.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if !data.starts_with(&[0xFF, SOI]) {
            return Err(Error::ImageDecode("JPEG: missing SOI marker".to_string()));
        }

        let mut adobe = false;
        let mut pos = 2;
        while pos + 1 < data.len() {
            if data[pos] != 0xFF {
                pos += 1;
                continue;
            }
            let marker = data[pos + 1];
            pos += 2;

            match marker {
                // Fill bytes and stuffed zeros
                0xFF | 0x00 => {
                    pos -= 1;
                    continue;
                }
                // Standalone markers carry no length
                0x01 | 0xD0..=0xD7 => continue,
                SOS | EOI => break,
                _ => {}
            }

            let length = usize::from(be16(data, pos)?);
            if length < 2 {
                return Err(truncated());
            }
            let segment = data.get(pos + 2..pos + length).ok_or_else(truncated)?;

            if is_start_of_frame(marker) {
                return Self::from_frame(segment, adobe);
            }
            if marker == APP14 && segment.starts_with(b"Adobe") {
                adobe = true;
            }
            pos += length;
        }

        Err(Error::ImageDecode("JPEG: no start-of-frame segment".to_string()))
    }

    fn from_frame(segment: &[u8], adobe: bool) -> Result<Self> {
        // precision, height, width, component count
        let height = u32::from(be16(segment, 1)?);
        let width = u32::from(be16(segment, 3)?);
        let components = *segment.get(5).ok_or_else(truncated)?;
        if width == 0 || height == 0 {
            return Err(Error::ImageDecode(format!("JPEG: invalid size {width}x{height}")));
        }
        Ok(Self {
            width,
            height,
            components,
            adobe,
        })
    }

    /// PDF colour space name for the component count.
    pub const fn color_space(&self) -> &'static [u8] {
        match self.components {
            1 => b"DeviceGray",
            4 => b"DeviceCMYK",
            _ => b"DeviceRGB",
        }
    }

    /// Adobe writes CMYK JPEGs with inverted samples, which the image
    /// dictionary undoes with a `Decode` array.
    pub const fn is_inverted_cmyk(&self) -> bool {
        self.components == 4 && self.adobe
    }
}

const fn is_start_of_frame(marker: u8) -> bool {
    matches!(
        marker,
        0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE | 0xCF
    )
}

fn be16(data: &[u8], pos: usize) -> Result<u16> {
    match data.get(pos..pos + 2) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err(truncated()),
    }
}

fn truncated() -> Error {
    Error::ImageDecode("JPEG: truncated header".to_string())
}
