//! Grayscale image collaborator.
//!
//! The engine works on flat symbol sequences. This module turns a PGM file
//! into a flat row-major run of 8-bit intensities plus its [`Shape`], and
//! puts a decoded flat run back into a 2-D image.

use std::fmt;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

impl Shape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Pixel count, or `None` when `width * height` does not fit a `usize`.
    pub fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Pixel count. Shapes parsed from files are already known to fit;
    /// an overflowing shape saturates and so can never match a real buffer.
    pub fn area(&self) -> usize {
        self.checked_area().unwrap_or(usize::MAX)
    }
}

#[derive(Debug)]
pub enum ImageError {
    BadMagic,
    BadHeader(&'static str),
    UnsupportedMaxval(u32),
    TruncatedPixels { expected: usize, found: usize },
    ShapeMismatch { shape: Shape, pixels: usize },
    Io(io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::BadMagic =>
                write!(f, "not a PGM image (expected P2 or P5)"),
            ImageError::BadHeader(field) =>
                write!(f, "invalid PGM header field: {}", field),
            ImageError::UnsupportedMaxval(v) =>
                write!(f, "unsupported maxval {} (only 8-bit images)", v),
            ImageError::TruncatedPixels { expected, found } =>
                write!(f, "expected {} pixels, found {}", expected, found),
            ImageError::ShapeMismatch { shape, pixels } =>
                write!(f, "{} pixels do not fill a {}x{} image", pixels, shape.width, shape.height),
            ImageError::Io(e) =>
                write!(f, "image i/o error: {}", e),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> Self {
        ImageError::Io(e)
    }
}

/// 8-bit grayscale image stored as a flat row-major pixel run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    shape: Shape,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Reshapes a flat pixel run; its length must be exactly `width * height`.
    pub fn from_pixels(shape: Shape, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if pixels.len() != shape.area() {
            return Err(ImageError::ShapeMismatch {
                shape,
                pixels: pixels.len(),
            });
        }
        Ok(Self { shape, pixels })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks() panics on zero, and a zero-width image has no pixels anyway
        self.pixels.chunks(self.shape.width.max(1))
    }

    pub fn read_pgm<R: Read>(reader: &mut R) -> Result<Self, ImageError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse_pgm(&data)
    }

    pub fn parse_pgm(data: &[u8]) -> Result<Self, ImageError> {
        let mut header = HeaderReader { data, pos: 0 };

        let binary = match header.token() {
            Some(b"P5") => true,
            Some(b"P2") => false,
            _ => return Err(ImageError::BadMagic),
        };
        let width = header.number("width")?;
        let height = header.number("height")?;
        let maxval = header.number("maxval")?;
        if maxval == 0 || maxval > 255 {
            return Err(ImageError::UnsupportedMaxval(maxval as u32));
        }

        let shape = Shape::new(width, height);
        let expected = shape
            .checked_area()
            .ok_or(ImageError::BadHeader("dimensions"))?;

        let pixels = if binary {
            // exactly one whitespace byte separates maxval from the raster
            let start = header.pos + 1;
            let raster = data.get(start..).unwrap_or(&[]);
            if raster.len() < expected {
                return Err(ImageError::TruncatedPixels {
                    expected,
                    found: raster.len(),
                });
            }
            raster[..expected].to_vec()
        } else {
            // every ASCII pixel needs at least one byte, so the file bounds the count
            let mut pixels = Vec::with_capacity(expected.min(data.len()));
            while pixels.len() < expected {
                match header.token() {
                    Some(token) => {
                        let value = parse_number(token, "pixel")?;
                        if value > maxval {
                            return Err(ImageError::BadHeader("pixel"));
                        }
                        pixels.push(value as u8);
                    }
                    None => {
                        return Err(ImageError::TruncatedPixels {
                            expected,
                            found: pixels.len(),
                        })
                    }
                }
            }
            pixels
        };

        Self::from_pixels(shape, pixels)
    }

    /// Writes a binary (P5) PGM.
    pub fn write_pgm<W: Write>(&self, writer: &mut W) -> Result<(), ImageError> {
        write!(writer, "P5\n{} {}\n255\n", self.shape.width, self.shape.height)?;
        writer.write_all(&self.pixels)?;
        writer.flush()?;
        Ok(())
    }
}

/// Whitespace/comment aware tokenizer over a PGM header.
struct HeaderReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn skip_blank(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'#' => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn token(&mut self) -> Option<&'a [u8]> {
        self.skip_blank();
        let data = self.data;
        let start = self.pos;
        while self.pos < data.len() && !data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let end = self.pos;
        (end > start).then(|| &data[start..end])
    }

    fn number(&mut self, field: &'static str) -> Result<usize, ImageError> {
        let token = self.token().ok_or(ImageError::BadHeader(field))?;
        parse_number(token, field)
    }
}

fn parse_number(token: &[u8], field: &'static str) -> Result<usize, ImageError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ImageError::BadHeader(field))
}
