// Flat directory of `<YYYY-MM-DD>.json` records.

use crate::apod::Apod;
use crate::date::ApodDate;
use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ApodStore {
    dir: PathBuf,
}

impl ApodStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, date: ApodDate) -> PathBuf {
        self.dir.join(date.file_name())
    }

    /// Whether a record for `date` is already on disk. A missing file is
    /// `false`; any other failure is returned.
    pub fn exists(&self, date: ApodDate) -> Result<bool> {
        let path = self.path_for(date);
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::from_io(&path, e)),
        }
    }

    /// Write `apod` to a new file. Never replaces an existing one: a clash
    /// surfaces as `Error::AlreadyExists`.
    pub fn save(&self, apod: &Apod) -> Result<PathBuf> {
        let path = self.path_for(apod.date);
        let json = apod.to_pretty_json()?;
        create_exclusive(&path, |file| file.write_all(&json))?;
        debug!(target: "apod::store", "wrote {}", path.display());
        Ok(path)
    }

    pub fn load(&self, date: ApodDate) -> Result<Apod> {
        let path = self.path_for(date);
        read_record(&path)
    }

    /// Every `*.json` record in the directory, in iteration order.
    pub fn list(&self) -> Result<Vec<Apod>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| Error::OpenDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::from_io(&self.dir, e))?;
            let is_json = entry.file_name().to_string_lossy().ends_with(".json");
            if !is_json {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            records.push(read_record(&path)?);
        }
        debug!(target: "apod::store", "found {} records in {}", records.len(), self.dir.display());
        Ok(records)
    }
}

/// Create `path` (failing if it exists) and fill it. A failed fill removes
/// the partial file so the date is not left looking saved.
fn create_exclusive<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| Error::from_io(path, e))?;
    if let Err(e) = fill(&mut file) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(Error::from_io(path, e));
    }
    Ok(())
}

fn read_record(path: &Path) -> Result<Apod> {
    let data = fs::read(path).map_err(|e| Error::from_io(path, e))?;
    Ok(serde_json::from_slice(&data)?)
}
