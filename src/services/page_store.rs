use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};
use tempfile::Builder;
use time::OffsetDateTime;

use crate::errors::WikiError;
use crate::routing::Title;
use crate::types::Page;

/// Flat-file page storage: one `<title>.txt` per page in a single directory.
#[derive(Debug, Clone)]
pub struct PageStore {
    pages_dir: Arc<PathBuf>,
}

impl PageStore {
    /// Create a store over an existing directory
    pub fn new(pages_dir: PathBuf) -> Self {
        debug!("Creating PageStore with pages directory: {:?}", pages_dir);
        Self { pages_dir: Arc::new(pages_dir) }
    }

    /// Create a store, making the pages directory if it is missing
    pub fn open(pages_dir: PathBuf) -> Result<Self, WikiError> {
        fs::create_dir_all(&pages_dir).map_err(|e| {
            error!("Failed to create pages directory {:?}: {}", pages_dir, e);
            WikiError::Io(e)
        })?;
        Ok(Self::new(pages_dir))
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Path of the file backing `title`
    pub fn path_for(&self, title: &Title) -> PathBuf {
        self.pages_dir.join(title.file_name())
    }

    /// Write the page body over whatever the slot held before.
    ///
    /// The body goes to an owner-only temporary file in the pages directory
    /// which is then renamed onto `<title>.txt`, so a reader sees either the
    /// old body or the new one.
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        let path = self.path_for(&page.title);
        debug!("Saving page '{}' to {:?}", page.title, path);

        let mut tmp = Builder::new()
            .prefix(".flatwiki-")
            .suffix(".tmp")
            .tempfile_in(self.pages_dir.as_path())
            .map_err(|e| save_failed(&path, e))?;
        tmp.write_all(&page.body).map_err(|e| save_failed(&path, e))?;
        tmp.as_file().sync_all().map_err(|e| save_failed(&path, e))?;
        tmp.persist(&path).map_err(|e| save_failed(&path, e.error))?;

        info!("Saved page '{}', {} bytes", page.title, page.body.len());
        Ok(())
    }

    /// Read the page stored under `title`.
    pub fn load(&self, title: &Title) -> Result<Page, WikiError> {
        let path = self.path_for(title);
        debug!("Loading page '{}' from {:?}", title, path);

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Page does not exist: {:?}", path);
                return Err(WikiError::PageNotFound(title.clone()));
            }
            Err(e) => {
                error!("Failed to open page {:?}: {}", path, e);
                return Err(WikiError::Io(e));
            }
        };

        let mut body = Vec::new();
        file.read_to_end(&mut body).map_err(|e| {
            error!("Failed to read page {:?}: {}", path, e);
            WikiError::Io(e)
        })?;
        let modified = self.last_modified(title);

        info!("Loaded page '{}', {} bytes", title, body.len());
        Ok(Page { title: title.clone(), body, modified })
    }

    /// Modification time of the file backing `title`, if it has one
    pub fn last_modified(&self, title: &Title) -> Option<OffsetDateTime> {
        fs::metadata(self.path_for(title))
            .and_then(|m| m.modified())
            .map(OffsetDateTime::from)
            .map_err(|e| debug!("No modification time for '{}': {}", title, e))
            .ok()
    }

    /// Check whether a page has been saved under `title`
    pub fn exists(&self, title: &Title) -> bool {
        let exists = self.path_for(title).is_file();
        debug!("Page exists check: '{}' -> {}", title, exists);
        exists
    }
}

fn save_failed(path: &Path, e: io::Error) -> WikiError {
    error!("Failed to save page {:?}: {}", path, e);
    WikiError::Io(e)
}
