//! Single-band classification raster decoding.
//!
//! MapBiomas collection rasters are grayscale GeoTIFFs whose pixel values are
//! integer class codes (0 = no data). Decoding widens every supported sample
//! format to u32 so downstream code sees one code type.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("cannot open raster: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF decoding error: {0}")]
    Decode(#[from] tiff::TiffError),

    #[error("unsupported pixel format in TIFF: {0}")]
    UnsupportedPixelFormat(String),

    #[error("band has {got} samples, expected {expected} ({width}×{height})")]
    BandShape {
        got: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("raster path template needs exactly one {{}} placeholder: {0:?}")]
    BadTemplate(String),
}

/// A decoded classification raster, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGrid {
    /// Row-major class codes.
    pub data: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

impl ClassGrid {
    pub fn new(width: usize, height: usize, data: Vec<u32>) -> Self {
        Self { data, width, height }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.width + col]
    }
}

/// Decode the single band of a grayscale integer TIFF into a `ClassGrid`.
///
/// U8 and U16 samples are widened to u32. Multi-channel images and float or
/// signed sample formats are rejected as `UnsupportedPixelFormat`.
pub fn read_class_grid(path: &Path) -> Result<ClassGrid, RasterError> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;
    let (width, height) = decoder.dimensions()?;

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(RasterError::UnsupportedPixelFormat(format!("{:?}", other)));
        }
    }

    let data: Vec<u32> = match decoder.read_image()? {
        DecodingResult::U8(buf) => buf.into_iter().map(u32::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(u32::from).collect(),
        DecodingResult::U32(buf) => buf,
        _ => {
            return Err(RasterError::UnsupportedPixelFormat(
                "non-integer sample format".to_string(),
            ));
        }
    };

    let expected = width as usize * height as usize;
    if data.len() != expected {
        return Err(RasterError::BandShape {
            got: data.len(),
            expected,
            width,
            height,
        });
    }

    Ok(ClassGrid::new(width as usize, height as usize, data))
}

/// Yearly raster path pattern, e.g. `classificacao_{}.tif`.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    prefix: String,
    suffix: String,
}

impl PathTemplate {
    /// Validate that `template` contains exactly one `{}` placeholder.
    pub fn new(template: &str) -> Result<Self, RasterError> {
        let Some(idx) = template.find("{}") else {
            return Err(RasterError::BadTemplate(template.to_string()));
        };
        let suffix = &template[idx + 2..];
        if suffix.contains("{}") {
            return Err(RasterError::BadTemplate(template.to_string()));
        }
        Ok(Self {
            prefix: template[..idx].to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Substitute the year into the placeholder.
    pub fn path_for(&self, year: i32) -> PathBuf {
        PathBuf::from(format!("{}{}{}", self.prefix, year, self.suffix))
    }
}
