use std::path::PathBuf;

pub use cli::CLIParser;
pub use error::Error;
use raster::reader::{BoundsPolicy, FileStripReader};
use raster::writer::{FileImageWriter, ImageWriter};
use strips::{BlendMethod, CompositionOptions, ProgressObserver, StdoutProgress, StripCompositor};

mod cli;
pub mod discovery;
mod error;
mod logger;
pub mod raster;
pub mod strips;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_directory: PathBuf,
    output_file: PathBuf,
    averaging: bool,
    blend_method: BlendMethod,
    bounds_policy: BoundsPolicy,
    pattern: String,
    number_of_threads: usize,
    jpeg_quality: u8,
}

impl From<&Arguments> for CompositionOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            averaging: value.averaging,
            blend_method: value.blend_method,
            number_of_threads: value.number_of_threads,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StitchSummary {
    pub number_of_sources: usize,
    pub width: usize,
    pub height: usize,
}

/// Combines the matching images of the input directory into the output file
/// and prints one progress line per strip.
pub fn stitch_directory(arguments: &Arguments) -> Result<StitchSummary> {
    stitch_directory_with_progress(arguments, &mut StdoutProgress)
}

pub fn stitch_directory_with_progress(
    arguments: &Arguments,
    observer: &mut dyn ProgressObserver,
) -> Result<StitchSummary> {
    let sources = discovery::find_source_images(&arguments.input_directory, &arguments.pattern)?;
    let reader = FileStripReader::new(arguments.bounds_policy);
    let compositor = StripCompositor::new(reader, CompositionOptions::from(arguments));
    let assembled = compositor.compose(&sources, observer)?;
    let mut writer = FileImageWriter::new(&arguments.output_file, arguments.jpeg_quality);
    writer.write_image(&assembled)?;
    Ok(StitchSummary {
        number_of_sources: sources.len(),
        width: assembled.width(),
        height: assembled.height(),
    })
}
