//! Candidate discovery and decoding.
//!
//! Listing order is the file-name order, which fixes both report order and
//! tie-breaking for a given directory.

use crate::image::PixelGrid;
use crate::util::{InkMatchError, InkMatchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A candidate image on disk, keyed by its file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateFile {
    pub key: String,
    pub path: PathBuf,
}

impl CandidateFile {
    /// Creates a candidate keyed by the final component of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { key, path }
    }
}

/// Lists regular files in `dir`, sorted by file name.
pub fn list_candidates<P: AsRef<Path>>(dir: P) -> InkMatchResult<Vec<CandidateFile>> {
    let dir = dir.as_ref();
    let dataset_err = |err: std::io::Error| InkMatchError::Dataset {
        path: dir.display().to_string(),
        reason: err.to_string(),
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(dataset_err)? {
        let entry = entry.map_err(dataset_err)?;
        let file_type = entry.file_type().map_err(dataset_err)?;
        if !file_type.is_file() {
            continue;
        }
        candidates.push(CandidateFile {
            key: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }
    candidates.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(candidates)
}

/// Source of decoded pixel grids.
pub trait Decoder: Sync {
    /// Decodes the image stored at `path`.
    fn decode(&self, path: &Path) -> InkMatchResult<PixelGrid>;
}

impl<F> Decoder for F
where
    F: Fn(&Path) -> InkMatchResult<PixelGrid> + Sync,
{
    fn decode(&self, path: &Path) -> InkMatchResult<PixelGrid> {
        self(path)
    }
}

/// Decoder backed by the `image` crate.
#[cfg(feature = "image-io")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

#[cfg(feature = "image-io")]
impl Decoder for ImageDecoder {
    fn decode(&self, path: &Path) -> InkMatchResult<PixelGrid> {
        crate::image::io::load_pixel_grid(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{list_candidates, CandidateFile};
    use crate::util::InkMatchError;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "inkmatch-dataset-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_files_in_name_order() {
        let dir = scratch_dir("order");
        for name in ["c.png", "a.png", "b.txt"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::create_dir(dir.join("nested")).unwrap();

        let keys: Vec<_> = list_candidates(&dir)
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["a.png", "b.txt", "c.png"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_a_dataset_error() {
        let dir = std::env::temp_dir().join("inkmatch-dataset-does-not-exist");
        assert!(matches!(
            list_candidates(&dir),
            Err(InkMatchError::Dataset { .. })
        ));
    }

    #[test]
    fn key_is_file_name() {
        let candidate = CandidateFile::from_path("glyphs/alpha.png");
        assert_eq!(candidate.key, "alpha.png");
    }
}
