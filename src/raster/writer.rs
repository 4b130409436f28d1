use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageFormat};

use super::{RgbGrids, Sample};
use crate::error::Error;
use crate::Result;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub trait ImageWriter {
    fn write_image(&mut self, image: &RgbGrids<Sample>) -> Result<()>;
}

/// Encodes into the format named by the destination's extension.
pub struct FileImageWriter<'a> {
    destination: &'a Path,
    jpeg_quality: u8,
}

impl<'a> FileImageWriter<'a> {
    pub fn new(destination: &'a Path, jpeg_quality: u8) -> Self {
        Self {
            destination,
            jpeg_quality,
        }
    }

    fn destination_name(&self) -> String {
        self.destination.display().to_string()
    }

    fn output_format(&self) -> Result<ImageFormat> {
        match ImageFormat::from_path(self.destination) {
            Ok(format) if format.writing_enabled() => Ok(format),
            _ => Err(Error::UnsupportedOutputFormat(self.destination_name())),
        }
    }

    fn open_output_file(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.destination)
            .map_err(|e| Error::UnableToOpenOutputFileForWriting(self.destination_name(), e))
    }

    fn encode(
        &self,
        writer: &mut BufWriter<File>,
        format: ImageFormat,
        image: &RgbGrids<Sample>,
    ) -> std::result::Result<(), ImageError> {
        let pixels = image.interleave();
        let width = image.width() as u32;
        let height = image.height() as u32;
        match format {
            ImageFormat::Png => PngEncoder::new_with_quality(
                &mut *writer,
                CompressionType::Best,
                FilterType::Adaptive,
            )
            .write_image(&pixels, width, height, ExtendedColorType::Rgb8)?,
            ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut *writer, self.jpeg_quality)
                .write_image(&pixels, width, height, ExtendedColorType::Rgb8)?,
            other => image::write_buffer_with_format(
                writer,
                &pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
                other,
            )?,
        }
        writer.flush().map_err(ImageError::IoError)
    }
}

impl ImageWriter for FileImageWriter<'_> {
    fn write_image(&mut self, image: &RgbGrids<Sample>) -> Result<()> {
        let format = self.output_format()?;
        let output_file = self.open_output_file()?;
        let mut output_file_writer = BufWriter::new(output_file);
        log::info!(
            "Writing {}x{} {:?} image to {}",
            image.width(),
            image.height(),
            format,
            self.destination.display()
        );
        if let Err(e) = self.encode(&mut output_file_writer, format, image) {
            drop(output_file_writer);
            // leave no truncated output behind
            if let Err(remove_error) = fs::remove_file(self.destination) {
                log::warn!(
                    "Unable to remove incomplete output {}: {}",
                    self.destination.display(),
                    remove_error
                );
            }
            return Err(Error::FailedToEncodeOutputImage(self.destination_name(), e));
        }
        Ok(())
    }
}
