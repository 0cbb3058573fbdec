//! # Catalog File Store
//!
//! The menu lives in a JSON file next to the database so staff can edit it
//! from the manager view (or by hand).
//!
//! ```text
//! load()  ──► file missing? ──yes──► write shipped default ──┐
//!               │ no                                          │
//!               ▼                                             ▼
//!          read text ──► Catalog::parse (BOM stripped, validated)
//!
//! save_text(text) ──► Catalog::parse ──► pretty JSON ──► menu.json.tmp ──► rename
//!                         │ invalid
//!                         ▼
//!                  CatalogError::Invalid, file untouched
//! ```
//!
//! Reads go to disk every time, so an edit is picked up by the next order.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use fireside_core::catalog::DEFAULT_CATALOG_JSON;
use fireside_core::Catalog;

/// File-backed catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CatalogStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the catalog, seeding the default menu first when
    /// the file does not exist.
    pub async fn load(&self) -> CatalogResult<Catalog> {
        let text = self.raw_text().await?;
        Ok(Catalog::parse(&text)?)
    }

    /// Current file contents for the editor, seeding the default when
    /// missing. Not validated.
    pub async fn raw_text(&self) -> CatalogResult<String> {
        self.ensure_seeded().await?;
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })
    }

    /// Validates edited text and replaces the file with its normalized form.
    ///
    /// Rejected text leaves the current file as it was.
    pub async fn save_text(&self, text: &str) -> CatalogResult<Catalog> {
        let catalog = match Catalog::parse(text) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Rejected catalog edit");
                return Err(e.into());
            }
        };
        self.save(&catalog).await?;
        Ok(catalog)
    }

    /// Writes a catalog as 2-space indented JSON through a temp file + rename.
    pub async fn save(&self, catalog: &Catalog) -> CatalogResult<()> {
        catalog.validate()?;
        let json = catalog.to_pretty_json()?;
        self.replace(json.as_bytes()).await?;

        info!(
            path = %self.path.display(),
            items = catalog.item_count(),
            "Catalog saved"
        );
        Ok(())
    }

    /// Writes the shipped menu if no catalog file exists yet.
    ///
    /// Returns `true` when a file was written.
    pub async fn ensure_seeded(&self) -> CatalogResult<bool> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| CatalogError::Seed {
                path: self.path.clone(),
                source,
            })?;
        if exists {
            return Ok(false);
        }

        self.replace(DEFAULT_CATALOG_JSON.as_bytes())
            .await
            .map_err(|e| match e {
                CatalogError::Write { path, source } => CatalogError::Seed { path, source },
                other => other,
            })?;

        info!(path = %self.path.display(), "Seeded default catalog");
        Ok(true)
    }

    async fn replace(&self, contents: &[u8]) -> CatalogResult<()> {
        let write_err = |source| CatalogError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)?;
        Ok(())
    }
}
