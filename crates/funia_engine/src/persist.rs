use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use funia_logging::{funia_debug, funia_warn};

/// Attempts at claiming a sequence number before giving up.
const MAX_CLAIM_ATTEMPTS: usize = 16;
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create it and any parents if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Sequence number of `output<N>.<jpg|jpeg|png|gif>`, matched case-insensitively.
pub fn parse_sequence_number(file_name: &str) -> Option<u64> {
    const PREFIX: &str = "output";
    if !file_name.get(..PREFIX.len())?.eq_ignore_ascii_case(PREFIX) {
        return None;
    }
    let rest = &file_name[PREFIX.len()..];
    let (digits, extension) = rest.split_once('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !IMAGE_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
    {
        return None;
    }
    digits.parse().ok()
}

/// One more than the highest existing sequence number in `dir`, or 1.
pub fn next_sequence_number(dir: &Path) -> Result<u64, PersistError> {
    let mut highest = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(n) = entry.file_name().to_str().and_then(parse_sequence_number) {
            highest = highest.max(n);
        }
    }
    Ok(highest.saturating_add(1))
}

pub fn output_file_name(sequence: u64) -> String {
    format!("output{sequence}.jpg")
}

/// Writes images into a folder as `output<N>.jpg`, numbering by directory scan.
#[derive(Debug, Clone)]
pub struct NumberedImageWriter {
    dir: PathBuf,
}

impl NumberedImageWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open a temporary file in the output folder for streaming an image into.
    pub fn begin(&self) -> Result<PendingImage, PersistError> {
        ensure_output_dir(&self.dir)?;
        // Doubles as the writability check for the folder.
        let tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| PersistError::OutputDir(e.to_string()))?;
        let file = tokio::fs::File::from_std(tmp.as_file().try_clone()?);
        Ok(PendingImage {
            dir: self.dir.clone(),
            tmp,
            file,
            written: 0,
        })
    }
}

/// An image being streamed to disk.
///
/// Dropping it before [`PendingImage::finish`] removes the temporary file, so
/// a failed transfer never leaves a numbered output behind.
pub struct PendingImage {
    dir: PathBuf,
    tmp: NamedTempFile,
    file: tokio::fs::File,
    written: u64,
}

impl PendingImage {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush and move the image to the next free `output<N>.jpg`.
    ///
    /// The move never replaces an existing file: if another writer claimed
    /// the number first, the folder is rescanned and the move retried.
    pub async fn finish(self) -> Result<PathBuf, PersistError> {
        let PendingImage {
            dir,
            mut tmp,
            mut file,
            ..
        } = self;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let target = dir.join(output_file_name(next_sequence_number(&dir)?));
            match tmp.persist_noclobber(&target) {
                Ok(_) => {
                    funia_debug!("Persisted image to {:?}", target);
                    return Ok(target);
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    funia_warn!("{:?} was claimed concurrently; renumbering", target);
                    tmp = err.file;
                }
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "could not claim a free output sequence number",
        )))
    }
}
