// src/payload/model.rs
//! Documents (with version history) and folders
//!
//! Every method here mutates the payload in place; the session wraps them so
//! that each applied mutation schedules an autosave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayloadError, VaultPayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub version_id: String,
    pub file_data_url: String,
    pub file_name: String,
    pub file_type: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub version_notes: String,
}

/// A document and its versions, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub versions: Vec<DocumentVersion>,
    #[serde(default)]
    pub folder_id: Option<String>,
}

impl Document {
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.versions.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Upload data for a new version; id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub file_data_url: String,
    pub file_name: String,
    pub file_type: String,
    pub version_notes: String,
}

impl NewVersion {
    fn into_version(self) -> DocumentVersion {
        DocumentVersion {
            version_id: Uuid::new_v4().to_string(),
            file_data_url: self.file_data_url,
            file_name: self.file_name,
            file_type: self.file_type,
            uploaded_at: Utc::now(),
            version_notes: self.version_notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPosition {
    Before,
    After,
}

impl VaultPayload {
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn add_document(
        &mut self,
        name: &str,
        folder_id: Option<&str>,
        version: NewVersion,
    ) -> Result<String, PayloadError> {
        if let Some(folder_id) = folder_id {
            self.require_folder(folder_id)?;
        }

        let id = Uuid::new_v4().to_string();
        self.documents.push(Document {
            id: id.clone(),
            name: name.to_owned(),
            created_at: Utc::now(),
            versions: vec![version.into_version()],
            folder_id: folder_id.map(str::to_owned),
        });
        Ok(id)
    }

    /// Prepend a version so `versions[0]` stays the newest.
    pub fn add_version(&mut self, doc_id: &str, version: NewVersion) -> Result<String, PayloadError> {
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.id == doc_id)
            .ok_or_else(|| PayloadError::UnknownDocument(doc_id.to_owned()))?;

        let version = version.into_version();
        let version_id = version.version_id.clone();
        doc.versions.insert(0, version);
        Ok(version_id)
    }

    pub fn delete_document(&mut self, doc_id: &str) -> Result<Document, PayloadError> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == doc_id)
            .ok_or_else(|| PayloadError::UnknownDocument(doc_id.to_owned()))?;
        Ok(self.documents.remove(idx))
    }

    pub fn move_document(&mut self, doc_id: &str, target: Option<&str>) -> Result<(), PayloadError> {
        if let Some(target) = target {
            self.require_folder(target)?;
        }
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.id == doc_id)
            .ok_or_else(|| PayloadError::UnknownDocument(doc_id.to_owned()))?;
        doc.folder_id = target.map(str::to_owned);
        Ok(())
    }

    pub fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String, PayloadError> {
        if let Some(parent_id) = parent_id {
            self.require_folder(parent_id)?;
        }

        let id = Uuid::new_v4().to_string();
        self.folders.push(Folder {
            id: id.clone(),
            name: name.to_owned(),
            created_at: Utc::now(),
            parent_id: parent_id.map(str::to_owned),
        });
        Ok(id)
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<(), PayloadError> {
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| PayloadError::UnknownFolder(folder_id.to_owned()))?;
        folder.name = name.to_owned();
        Ok(())
    }

    /// Remove a folder. Its documents and direct subfolders move to the root.
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<(), PayloadError> {
        self.require_folder(folder_id)?;

        for doc in &mut self.documents {
            if doc.folder_id.as_deref() == Some(folder_id) {
                doc.folder_id = None;
            }
        }
        for folder in &mut self.folders {
            if folder.parent_id.as_deref() == Some(folder_id) {
                folder.parent_id = None;
            }
        }
        self.folders.retain(|f| f.id != folder_id);
        Ok(())
    }

    /// Re-parent a folder; `None` moves it to the root.
    pub fn move_folder(&mut self, folder_id: &str, target_parent: Option<&str>) -> Result<(), PayloadError> {
        self.require_folder(folder_id)?;

        if let Some(target) = target_parent {
            self.require_folder(target)?;
            if target == folder_id || self.descendants(folder_id).iter().any(|d| d == target) {
                return Err(PayloadError::CircularMove);
            }
        }

        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == folder_id) {
            folder.parent_id = target_parent.map(str::to_owned);
        }
        Ok(())
    }

    /// Move `dragged` next to `target` in display order.
    pub fn reorder_folder(
        &mut self,
        dragged: &str,
        target: &str,
        position: ReorderPosition,
    ) -> Result<(), PayloadError> {
        let from = self
            .folders
            .iter()
            .position(|f| f.id == dragged)
            .ok_or_else(|| PayloadError::UnknownFolder(dragged.to_owned()))?;
        if !self.folders.iter().any(|f| f.id == target) {
            return Err(PayloadError::UnknownFolder(target.to_owned()));
        }
        if dragged == target {
            return Ok(());
        }

        let moved = self.folders.remove(from);
        // target index shifts once `dragged` is out of the list
        let mut to = self
            .folders
            .iter()
            .position(|f| f.id == target)
            .unwrap_or(self.folders.len());
        if position == ReorderPosition::After {
            to += 1;
        }
        self.folders.insert(to, moved);
        Ok(())
    }

    /// All folder ids below `folder_id`, at any depth.
    pub fn descendants(&self, folder_id: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut frontier = vec![folder_id.to_owned()];
        while let Some(current) = frontier.pop() {
            for child in self
                .folders
                .iter()
                .filter(|f| f.parent_id.as_deref() == Some(current.as_str()))
            {
                // guards against cycles already present in stored data
                if child.id != folder_id && !found.contains(&child.id) {
                    found.push(child.id.clone());
                    frontier.push(child.id.clone());
                }
            }
        }
        found
    }

    fn require_folder(&self, folder_id: &str) -> Result<(), PayloadError> {
        if self.folders.iter().any(|f| f.id == folder_id) {
            Ok(())
        } else {
            Err(PayloadError::UnknownFolder(folder_id.to_owned()))
        }
    }
}
