//! Archival copies of generated letters.
//!
//! Each PDF is copied from the reports directory into
//! `<root>/<client>/<address>/`, with spaces in both segments replaced by
//! underscores.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0} is required for archiving")]
    MissingField(&'static str),
    #[error("invalid archive folder name: {0:?}")]
    InvalidSegment(String),
    #[error("failed to create archive folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Archiver {
    root: PathBuf,
    reports_dir: PathBuf,
}

impl Archiver {
    pub fn new(root: impl Into<PathBuf>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reports_dir: reports_dir.into(),
        }
    }

    /// Folder that receives documents for this client and property.
    pub fn destination_dir(
        &self,
        client_name: Option<&str>,
        address: Option<&str>,
    ) -> Result<PathBuf, ArchiveError> {
        let client = client_name.ok_or(ArchiveError::MissingField("client_name"))?;
        let address = address.ok_or(ArchiveError::MissingField("address"))?;
        Ok(self
            .root
            .join(folder_segment(client)?)
            .join(folder_segment(address)?))
    }

    /// Copy `pdf_name` from the reports directory into the archive tree.
    pub fn archive(
        &self,
        pdf_name: &str,
        client_name: Option<&str>,
        address: Option<&str>,
    ) -> Result<PathBuf, ArchiveError> {
        let dir = self.destination_dir(client_name, address)?;
        fs::create_dir_all(&dir).map_err(|source| ArchiveError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let from = self.reports_dir.join(pdf_name);
        let to = dir.join(pdf_name);
        fs::copy(&from, &to).map_err(|source| ArchiveError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        Ok(to)
    }
}

fn folder_segment(value: &str) -> Result<String, ArchiveError> {
    let segment = value.trim().replace([' ', '/', '\\'], "_");
    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(ArchiveError::InvalidSegment(value.to_string()));
    }
    Ok(segment)
}
