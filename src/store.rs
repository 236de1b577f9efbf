//! Persistence of rendered chart documents.
//!
//! Documents are plain HTML files named after [`Snapshot::document_name`]
//! (e.g. `01012023_US.html`), which is the sole lookup key. The store does
//! not interpret document contents.
//!
//! [`Snapshot::document_name`]: crate::model::Snapshot::document_name

use crate::error::ChartError;
use crate::model::{parse_document_name, Region};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use directories::ProjectDirs;
use std::io;
use std::path::PathBuf;

/// One stored document, with its name parsed back into date and region for
/// display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub name: String,
    pub date: NaiveDate,
    pub region: Region,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn save(&self, name: &str, html: &str) -> Result<(), ChartError>;
    async fn read(&self, name: &str) -> Result<Option<String>, ChartError>;
    /// All stored documents, newest chart date first.
    async fn list(&self) -> Result<Vec<DocumentRef>, ChartError>;
}

pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default output directory under the user's data dir.
    pub fn default_dir() -> Result<PathBuf> {
        let proj = ProjectDirs::from("dev", "chartsnap", "chartsnap")
            .context("unable to determine data directory for chart documents")?;
        Ok(proj.data_dir().join("result"))
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.html"))
    }

    fn persistence(name: &str) -> impl FnOnce(io::Error) -> ChartError + '_ {
        move |source| ChartError::Persistence {
            name: name.to_string(),
            source,
        }
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn save(&self, name: &str, html: &str) -> Result<(), ChartError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(Self::persistence(name))?;
        tokio::fs::write(self.path_for(name), html)
            .await
            .map_err(Self::persistence(name))
    }

    async fn read(&self, name: &str) -> Result<Option<String>, ChartError> {
        // Only names the store itself produces are addressable; anything
        // else (including traversal attempts) is simply not found.
        if parse_document_name(name).is_none() {
            return Ok(None);
        }
        match tokio::fs::read_to_string(self.path_for(name)).await {
            Ok(html) => Ok(Some(html)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::persistence(name)(err)),
        }
    }

    async fn list(&self) -> Result<Vec<DocumentRef>, ChartError> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Self::persistence("<list>")(err)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(Self::persistence("<list>"))?
        {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str().and_then(|f| f.strip_suffix(".html")) else {
                continue;
            };
            if let Some((date, region)) = parse_document_name(name) {
                documents.push(DocumentRef {
                    name: name.to_string(),
                    date,
                    region,
                });
            }
        }

        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
        Ok(documents)
    }
}
