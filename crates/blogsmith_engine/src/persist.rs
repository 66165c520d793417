use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` (and parents) unless it already is a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        Err(err) => Err(PersistError::Io(err)),
    }
}

/// Writes artifacts into one directory via a sibling temp file and a rename,
/// so a reader never sees a half-written download.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Replaces `{dir}/{filename}` with `bytes` and returns its path.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}
