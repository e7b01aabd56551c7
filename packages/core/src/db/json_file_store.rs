//! JSON file record store
//!
//! Persists the collection as a pretty-printed JSON array. Writes go to a
//! sibling temp file that is then renamed over the target, so a crash never
//! leaves a half-written file behind. The id watermark lives in a small
//! sibling file (`family.json` keeps it in `family.json.ids`) so the main
//! file stays a plain export.

use crate::db::RecordStore;
use crate::export::json::{from_json, to_json};
use crate::models::{PersonId, PersonRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdWatermark {
    next_id: PersonId,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "records.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    fn ids_path(&self) -> PathBuf {
        self.sibling_path(".ids")
    }

    /// Read `path`, mapping a missing file to `None`
    async fn read_optional(path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Write `body` to a temp file, then rename it over `target`
    async fn replace_file(&self, target: &Path, body: String) -> Result<()> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut temp = target.as_os_str().to_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);
        tokio::fs::write(&temp, body)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        tokio::fs::rename(&temp, target)
            .await
            .with_context(|| format!("Failed to replace {}", target.display()))
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Vec<PersonRecord>>> {
        let Some(contents) = Self::read_optional(&self.path).await? else {
            tracing::debug!("No record file at {}", self.path.display());
            return Ok(None);
        };

        let records = from_json(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        tracing::info!("Loaded {} record(s) from {}", records.len(), self.path.display());
        Ok(Some(records))
    }

    async fn save(&self, records: &[PersonRecord]) -> Result<()> {
        let body = to_json(records)?;
        self.replace_file(&self.path, body).await?;

        tracing::info!("Saved {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    async fn load_next_id(&self) -> Result<Option<PersonId>> {
        let path = self.ids_path();
        let Some(contents) = Self::read_optional(&path).await? else {
            return Ok(None);
        };

        let watermark: IdWatermark = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(watermark.next_id))
    }

    async fn save_next_id(&self, next: PersonId) -> Result<()> {
        let body = serde_json::to_string(&IdWatermark { next_id: next })?;
        self.replace_file(&self.ids_path(), body).await?;

        tracing::debug!("Saved id watermark {} to {}", next, self.ids_path().display());
        Ok(())
    }
}
