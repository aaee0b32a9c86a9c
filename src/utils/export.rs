//! Encoding the rendered RGB buffer for the display

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::GrayImage;
use tracing::info;

use crate::utils::errors::{DashResult, DashboardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 8-bit greyscale BMP
    #[default]
    Bmp,
    /// Raw 1 bit per pixel, white = 1
    OneBit,
    /// Raw 2 bits per pixel, 0 = black .. 3 = white
    TwoBit,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bmp" => Ok(OutputFormat::Bmp),
            "1bit" => Ok(OutputFormat::OneBit),
            "2bit" => Ok(OutputFormat::TwoBit),
            other => Err(format!("unknown output format '{}', expected bmp, 1bit or 2bit", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Bmp => write!(f, "bmp"),
            OutputFormat::OneBit => write!(f, "1bit"),
            OutputFormat::TwoBit => write!(f, "2bit"),
        }
    }
}

/// Greyscale value of each RGB pixel (Rec. 601 weights)
pub fn rgb_to_luma(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|p| {
            let l = 299 * u32::from(p[0]) + 587 * u32::from(p[1]) + 114 * u32::from(p[2]);
            ((l + 500) / 1000) as u8
        })
        .collect()
}

/// 8 pixels per byte, most significant bit first; rows are padded to a byte
pub fn pack_1bit(luma: &[u8], width: usize) -> Vec<u8> {
    pack(luma, width, 1, |l| u8::from(l >= 128))
}

/// 4 pixels per byte, most significant pair first; rows are padded to a byte
pub fn pack_2bit(luma: &[u8], width: usize) -> Vec<u8> {
    pack(luma, width, 2, |l| l >> 6)
}

fn pack(luma: &[u8], width: usize, bits: usize, level: impl Fn(u8) -> u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let per_byte = 8 / bits;
    let mut out = Vec::with_capacity(luma.len().div_ceil(per_byte));

    for row in luma.chunks(width) {
        for group in row.chunks(per_byte) {
            let mut byte = 0u8;
            for (i, &l) in group.iter().enumerate() {
                byte |= level(l) << (8 - bits * (i + 1));
            }
            out.push(byte);
        }
    }
    out
}

/// Encode `rgb` and write it to `path`
///
/// Everything is encoded in memory first so a failure leaves no file behind.
pub fn write_output(path: &Path, format: OutputFormat, width: u32, height: u32, rgb: &[u8]) -> DashResult<()> {
    let luma = rgb_to_luma(rgb);
    if luma.len() != (width * height) as usize {
        return Err(DashboardError::Export(format!(
            "buffer has {} pixels, expected {}x{}",
            luma.len(),
            width,
            height
        )));
    }

    match format {
        OutputFormat::Bmp => {
            let image = GrayImage::from_raw(width, height, luma)
                .ok_or_else(|| DashboardError::Export("buffer does not match image size".to_string()))?;
            let mut encoded = std::io::Cursor::new(Vec::new());
            image
                .write_to(&mut encoded, image::ImageFormat::Bmp)
                .map_err(|e| DashboardError::Export(e.to_string()))?;
            std::fs::write(path, encoded.into_inner())?;
        }
        OutputFormat::OneBit => std::fs::write(path, pack_1bit(&luma, width as usize))?,
        OutputFormat::TwoBit => std::fs::write(path, pack_2bit(&luma, width as usize))?,
    }

    info!("Wrote {} image to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("bmp".parse::<OutputFormat>(), Ok(OutputFormat::Bmp));
        assert_eq!("1BIT".parse::<OutputFormat>(), Ok(OutputFormat::OneBit));
        assert_eq!("2bit".parse::<OutputFormat>(), Ok(OutputFormat::TwoBit));
        assert!("png".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_luma() {
        assert_eq!(rgb_to_luma(&[0, 0, 0, 255, 255, 255, 128, 128, 128]), vec![0, 255, 128]);
    }

    #[test]
    fn test_pack_1bit_msb_first() {
        let luma = [255, 0, 0, 0, 0, 0, 0, 255, 200, 10];
        // second row byte is padded on the right
        assert_eq!(pack_1bit(&luma, 10), vec![0b1000_0001, 0b1000_0000]);
        assert_eq!(pack_1bit(&[127, 128], 2), vec![0b0100_0000]);
    }

    #[test]
    fn test_pack_2bit_levels() {
        let luma = [0, 64, 128, 255, 191];
        assert_eq!(pack_2bit(&luma, 5), vec![0b00_01_10_11, 0b10_00_00_00]);
    }

    #[test]
    fn test_pack_rows_are_padded() {
        let luma = vec![255u8; 6];
        // two rows of three pixels
        assert_eq!(pack_1bit(&luma, 3), vec![0b1110_0000, 0b1110_0000]);
    }

    #[test]
    fn test_write_bmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        let rgb = vec![255u8; 4 * 2 * 3];

        write_output(&path, OutputFormat::Bmp, 4, 2, &rgb).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn test_write_1bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut rgb = vec![255u8; 16 * 3];
        rgb[..3].copy_from_slice(&[0, 0, 0]);

        write_output(&path, OutputFormat::OneBit, 16, 1, &rgb).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0b0111_1111, 0xff]);
    }

    #[test]
    fn test_size_mismatch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");

        let err = write_output(&path, OutputFormat::Bmp, 4, 4, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, DashboardError::Export(_)));
        assert!(!path.exists());
    }
}
