use std::path::Path;

use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::{ColumnRange, RgbGrids, Sample};
use crate::error::Error;
use crate::Result;

/// How a column range reaching past the right edge of a source is handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundsPolicy {
    Reject,
    ZeroPad,
}

impl ValueEnum for BoundsPolicy {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Reject, Self::ZeroPad]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Reject => Some(PossibleValue::new("Reject")),
            Self::ZeroPad => Some(PossibleValue::new("ZeroPad")),
        }
    }
}

pub trait StripReader {
    /// Width and height of a source image.
    fn dimensions(&self, source: &Path) -> Result<(usize, usize)>;

    /// Reads the columns of `range` from all three channels of a source
    /// image, or the full width when no range is given.
    fn read_strip(&self, source: &Path, range: Option<ColumnRange>) -> Result<RgbGrids<Sample>>;
}

/// Decodes source images from the filesystem on every read.
pub struct FileStripReader {
    bounds_policy: BoundsPolicy,
}

impl FileStripReader {
    pub fn new(bounds_policy: BoundsPolicy) -> Self {
        Self { bounds_policy }
    }

    fn decode(source: &Path) -> Result<RgbGrids<Sample>> {
        // image::open releases the file handle before returning
        let image = image::open(source)
            .map_err(|e| Error::UnableToDecodeSourceImage(source.display().to_string(), e))?
            .into_rgb8();
        let (width, height) = image.dimensions();
        Ok(RgbGrids::from_interleaved(
            width as usize,
            height as usize,
            image.as_raw(),
        ))
    }
}

impl StripReader for FileStripReader {
    fn dimensions(&self, source: &Path) -> Result<(usize, usize)> {
        let (width, height) = image::image_dimensions(source)
            .map_err(|e| Error::UnableToDecodeSourceImage(source.display().to_string(), e))?;
        Ok((width as usize, height as usize))
    }

    fn read_strip(&self, source: &Path, range: Option<ColumnRange>) -> Result<RgbGrids<Sample>> {
        let image = Self::decode(source)?;
        log::trace!(
            "Decoded {} ({}x{})",
            source.display(),
            image.width(),
            image.height()
        );
        extract_strip(&image, range, self.bounds_policy, source)
    }
}

/// Cuts `range` out of a decoded image, applying `bounds_policy` to columns
/// beyond its right edge. A range with `start > end` is always rejected.
pub fn extract_strip(
    image: &RgbGrids<Sample>,
    range: Option<ColumnRange>,
    bounds_policy: BoundsPolicy,
    source: &Path,
) -> Result<RgbGrids<Sample>> {
    let width = image.width();
    let range = range.unwrap_or(ColumnRange::new(0, width));
    let out_of_bounds = || Error::StripOutOfBounds {
        path: source.display().to_string(),
        start: range.start,
        end: range.end,
        width,
    };
    if range.start > range.end {
        return Err(out_of_bounds());
    }
    if range.end <= width {
        return Ok(image.columns(range));
    }
    match bounds_policy {
        BoundsPolicy::Reject => Err(out_of_bounds()),
        BoundsPolicy::ZeroPad => {
            log::warn!(
                "Columns {} exceed width {} of {}, padding with zeros",
                range,
                width,
                source.display()
            );
            let mut strip = RgbGrids::filled(range.width(), image.height(), 0);
            if range.start < width {
                strip.write_columns(0, &image.columns(ColumnRange::new(range.start, width)));
            }
            Ok(strip)
        }
    }
}
