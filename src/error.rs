use std::fmt::Display;

use image::ImageError;

#[derive(Debug)]
pub enum Error {
    EmptySourceList,
    NoSourceImagesFound(String, String),
    UnableToReadInputDirectory(String, std::io::Error),
    UnableToDecodeSourceImage(String, ImageError),
    StripOutOfBounds {
        path: String,
        start: usize,
        end: usize,
        width: usize,
    },
    HeightMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },
    UnsupportedOutputFormat(String),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToEncodeOutputImage(String, ImageError),
    WorkerDisconnected(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySourceList => write!(f, "No source images were given"),
            Self::NoSourceImagesFound(directory, pattern) => {
                write!(
                    f,
                    "No source images matching '{}' found in '{}'",
                    pattern, directory
                )
            }
            Self::UnableToReadInputDirectory(directory, error) => {
                write!(
                    f,
                    "Unable to read input directory '{}': {}",
                    directory, error
                )
            }
            Self::UnableToDecodeSourceImage(path, error) => {
                write!(f, "Unable to decode source image '{}': {}", path, error)
            }
            Self::StripOutOfBounds {
                path,
                start,
                end,
                width,
            } => {
                write!(
                    f,
                    "Columns {}..{} are out of bounds for source image '{}' of width {}",
                    start, end, path, width
                )
            }
            Self::HeightMismatch {
                path,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Source image '{}' is {}px high, but {}px were expected",
                    path, actual, expected
                )
            }
            Self::UnsupportedOutputFormat(path) => {
                write!(f, "Output format of '{}' is not supported", path)
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToEncodeOutputImage(path, error) => {
                write!(f, "Failed to encode output image '{}': {}", path, error)
            }
            Self::WorkerDisconnected(index) => {
                write!(f, "Worker for strip {} stopped without a result", index)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToReadInputDirectory(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error) => Some(error),
            Self::UnableToDecodeSourceImage(_, error)
            | Self::FailedToEncodeOutputImage(_, error) => Some(error),
            _ => None,
        }
    }
}
