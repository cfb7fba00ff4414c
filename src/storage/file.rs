use crate::storage::traits::{LineStore, StorageError, StorageResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A list stored as a plain text file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until the store is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a lazy sequence over the stored entries
    ///
    /// Every call re-opens the file, so the source can be iterated as many
    /// times as needed. Lines are trimmed and blank lines skipped. A read
    /// error mid-way is yielded as the last item.
    ///
    /// # Returns
    ///
    /// * `Ok(LineSource)` - An iterator over the entries
    /// * `Err(StorageError)` - The file could not be opened
    pub fn lines(&self) -> StorageResult<LineSource> {
        let file = File::open(&self.path).map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        Ok(LineSource {
            path: self.path.clone(),
            lines: BufReader::new(file).lines(),
            failed: false,
        })
    }
}

impl LineStore for FileStore {
    fn read_lines(&self) -> StorageResult<Vec<String>> {
        self.lines()?.collect()
    }

    fn write_lines(&self, lines: &[String]) -> StorageResult<()> {
        // Write next to the target so the final rename stays on one filesystem
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_err = |source: std::io::Error| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            for line in lines {
                writer.write_all(line.as_bytes()).map_err(write_err)?;
                writer.write_all(b"\n").map_err(write_err)?;
            }
            writer.flush().map_err(write_err)?;
        }
        temp.as_file().sync_all().map_err(write_err)?;

        temp.persist(&self.path)
            .map_err(|e| StorageError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;

        tracing::debug!("Wrote {} entries to {}", lines.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Lazy iterator over the trimmed, non-blank lines of a file
pub struct LineSource {
    path: PathBuf,
    lines: std::io::Lines<BufReader<File>>,
    failed: bool,
}

impl Iterator for LineSource {
    type Item = StorageResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_string()));
                    }
                }
                Err(source) => {
                    self.failed = true;
                    return Some(Err(StorageError::Read {
                        path: self.path.clone(),
                        source,
                    }));
                }
            }
        }
    }
}
