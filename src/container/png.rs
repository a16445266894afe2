use super::{ContainerKind, FormatDescriptor};
use crate::error::{Result, StegError};
use crate::pipeline::stream::read_full;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat};
use std::io::{Read, Write};
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Bytes per pixel of the RGB raster used as cover
pub const RASTER_CHANNELS: u64 = 3;

/// Describe the raster from the IHDR chunk without decoding pixel data.
pub fn locate_png<R: Read>(reader: &mut R) -> Result<FormatDescriptor> {
    // signature(8) + IHDR length(4) + "IHDR"(4) + width(4) + height(4)
    let mut head = [0u8; 24];
    let read = read_full(reader, &mut head)?;
    if read < 8 || head[..8] != PNG_SIGNATURE {
        return Err(StegError::FormatNotFound("PNG signature".into()));
    }
    if read < head.len() || &head[12..16] != b"IHDR" {
        return Err(StegError::FormatNotFound("IHDR chunk".into()));
    }

    let width = u32::from_be_bytes([head[16], head[17], head[18], head[19]]) as u64;
    let height = u32::from_be_bytes([head[20], head[21], head[22], head[23]]) as u64;

    let capacity_bytes = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(RASTER_CHANNELS))
        .ok_or_else(|| StegError::FormatNotFound("IHDR dimensions".into()))?;

    Ok(FormatDescriptor {
        kind: ContainerKind::Png,
        start_offset: 0,
        capacity_bytes,
    })
}

/// Decoded, row-major RGB pixel buffer of a PNG image.
///
/// Alpha and palette information is dropped on load; the raster is written
/// back as an 8-bit RGB PNG.
#[derive(Debug, Clone)]
pub struct PngRaster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PngRaster {
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(data, ImageFormat::Png)?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgb.into_raw(),
        })
    }

    pub fn descriptor(&self) -> FormatDescriptor {
        FormatDescriptor {
            kind: ContainerKind::Png,
            start_offset: 0,
            capacity_bytes: self.pixels.len() as u64,
        }
    }

    /// Losslessly re-encode the raster as PNG
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        PngEncoder::new(writer).write_image(&self.pixels, self.width, self.height, ColorType::Rgb8)?;
        Ok(())
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes)?;
        Ok(bytes)
    }
}
