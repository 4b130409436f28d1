use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::Result;

pub const DEFAULT_PATTERN: &str = "*.jpg";

/// Lists the files of `directory` whose names match `pattern`, sorted
/// lexicographically. The order defines the order of the strips.
pub fn find_source_images(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let read_error = |e| Error::UnableToReadInputDirectory(directory.display().to_string(), e);
    let pattern: Vec<char> = pattern.chars().collect();
    let mut sources = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            log::debug!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        let file_name: Vec<char> = file_name.chars().collect();
        if matches_pattern(&pattern, &file_name) && path.is_file() {
            sources.push(path);
        }
    }
    if sources.is_empty() {
        return Err(Error::NoSourceImagesFound(
            directory.display().to_string(),
            pattern.iter().collect(),
        ));
    }
    sources.sort();
    log::info!(
        "Found {} source images in {}",
        sources.len(),
        directory.display()
    );
    Ok(sources)
}

/// Shell style wildcard match: `*` matches any run of characters, `?`
/// exactly one. Hidden names only match a pattern that starts with `.`.
fn matches_pattern(pattern: &[char], name: &[char]) -> bool {
    if name.first() == Some(&'.') && pattern.first() != Some(&'.') {
        return false;
    }
    let (mut pattern_index, mut name_index) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while name_index < name.len() {
        match pattern.get(pattern_index) {
            Some('*') => {
                backtrack = Some((pattern_index, name_index));
                pattern_index += 1;
            }
            Some(&expected) if expected == '?' || expected == name[name_index] => {
                pattern_index += 1;
                name_index += 1;
            }
            _ => match backtrack {
                Some((star_index, star_name_index)) => {
                    pattern_index = star_index + 1;
                    name_index = star_name_index + 1;
                    backtrack = Some((star_index, star_name_index + 1));
                }
                None => return false,
            },
        }
    }
    pattern[pattern_index..].iter().all(|&symbol| symbol == '*')
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{find_source_images, matches_pattern, DEFAULT_PATTERN};
    use crate::error::Error;

    fn matches(pattern: &str, name: &str) -> bool {
        let pattern: Vec<char> = pattern.chars().collect();
        let name: Vec<char> = name.chars().collect();
        matches_pattern(&pattern, &name)
    }

    fn get_test_directory(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("strip-stitcher-discovery-{}-{}", std::process::id(), name));
        if path.exists() {
            fs::remove_dir_all(&path).expect("Cleanup of test directory failed");
        }
        fs::create_dir_all(&path).expect("Creation of test directory failed");
        path
    }

    #[test]
    fn default_pattern_matches_jpg_only() {
        assert!(matches(DEFAULT_PATTERN, "frame_001.jpg"));
        assert!(!matches(DEFAULT_PATTERN, ".hidden.jpg"));
        assert!(!matches(DEFAULT_PATTERN, "frame_001.JPG"));
        assert!(!matches(DEFAULT_PATTERN, "frame_001.jpeg"));
        assert!(!matches(DEFAULT_PATTERN, "frame.jpg.png"));
    }

    #[test]
    fn wildcards_match_runs_and_single_characters() {
        assert!(matches("a*b*c", "aXXbYc"));
        assert!(matches("a*b*c", "abc"));
        assert!(matches("frame_??.png", "frame_01.png"));
        assert!(!matches("frame_??.png", "frame_1.png"));
        assert!(matches("*", "anything"));
        assert!(!matches("a*c", "abcd"));
        assert!(matches(".*", ".hidden"));
    }

    #[test]
    fn sources_are_sorted_and_filtered() {
        let directory = get_test_directory("sorted");
        for name in ["b.jpg", "a.jpg", "c.png", "10.jpg", "A.JPG"] {
            fs::write(directory.join(name), b"").expect("Creation of test file failed");
        }
        fs::create_dir(directory.join("d.jpg")).expect("Creation of test directory failed");
        let sources = find_source_images(&directory, DEFAULT_PATTERN)
            .expect("Listing of source images failed");
        let names: Vec<&str> = sources
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .collect();
        assert_eq!(names, vec!["10.jpg", "a.jpg", "b.jpg"]);
        fs::remove_dir_all(&directory).expect("Cleanup of test directory failed");
    }

    #[test]
    fn empty_directory_is_reported() {
        let directory = get_test_directory("empty");
        let result = find_source_images(&directory, DEFAULT_PATTERN);
        assert!(matches!(result, Err(Error::NoSourceImagesFound(..))));
        fs::remove_dir_all(&directory).expect("Cleanup of test directory failed");
    }

    #[test]
    fn missing_directory_is_reported() {
        let result = find_source_images(&PathBuf::from("does/not/exist"), DEFAULT_PATTERN);
        assert!(matches!(
            result,
            Err(Error::UnableToReadInputDirectory(..))
        ));
    }
}
