//! Filesystem entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docvault_core::types::VirtualPath;

/// The kind of a virtual filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// A folder (owns a placeholder marker object, never content).
    Folder,
    /// A regular document.
    File,
    /// An image document (rendered with a preview in the portal).
    Image,
}

impl EntryKind {
    /// Classify an uploaded file by its MIME type.
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(m) if m.starts_with("image/") => Self::Image,
            _ => Self::File,
        }
    }

    /// The `TYPE` component of the index sort key.
    pub fn sort_key_tag(&self) -> &'static str {
        match self {
            Self::Folder => "FOLDER",
            Self::File => "FILE",
            Self::Image => "IMAGE",
        }
    }
}

/// One folder, file, or image in a user's virtual filesystem.
///
/// The entry lives as a row in the metadata index (partition key = vault
/// scope, sort key = `TYPE#id`) while its bytes, if any, live in the object
/// store. The `id` is stable across renames by construction: renames change
/// `name` and `storage_key`, never the sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSystemEntry {
    /// Unique entry identifier (the id half of the sort key).
    pub id: Uuid,
    /// Display name, unique among siblings by convention only (last writer
    /// wins on collision).
    pub name: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// The virtual path of the containing folder.
    pub parent_path: VirtualPath,
    /// Full object-store key. `Some` for files and images; folders own a
    /// placeholder marker derived from their path instead.
    pub storage_key: Option<String>,
    /// Size in bytes (files and images only).
    pub size_bytes: Option<u64>,
    /// MIME type (files and images only).
    pub mime_type: Option<String>,
    /// Creation timestamp (files and images only).
    pub created_at: Option<DateTime<Utc>>,
    /// Number of direct children (folders only). Derived from the index at
    /// query time, so it may lag behind by one operation.
    pub child_count: Option<u64>,
    /// Back-reference to an external document-request workflow. When
    /// present the entry is owned by that workflow and must not be renamed
    /// or deleted here.
    pub linked_request_id: Option<Uuid>,
}

impl FileSystemEntry {
    /// Create a new folder entry under `parent_path`.
    pub fn new_folder(name: impl Into<String>, parent_path: VirtualPath) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: EntryKind::Folder,
            parent_path,
            storage_key: None,
            size_bytes: None,
            mime_type: None,
            created_at: None,
            child_count: Some(0),
            linked_request_id: None,
        }
    }

    /// Create a new file or image entry from an upload.
    pub fn new_file(create: CreateFileEntry) -> Self {
        let kind = EntryKind::from_mime(create.mime_type.as_deref());
        Self {
            id: Uuid::new_v4(),
            name: create.name,
            kind,
            parent_path: create.parent_path,
            storage_key: Some(create.storage_key),
            size_bytes: Some(create.size_bytes),
            mime_type: create.mime_type,
            created_at: Some(Utc::now()),
            child_count: None,
            linked_request_id: create.linked_request_id,
        }
    }

    /// The index sort key, `TYPE#id`.
    pub fn sort_key(&self) -> String {
        format!("{}#{}", self.kind.sort_key_tag(), self.id)
    }

    /// The entry's own virtual path.
    pub fn path(&self) -> VirtualPath {
        self.parent_path.join(&self.name)
    }

    /// Whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Whether the entry is owned by a document-request workflow and must
    /// not be renamed or deleted here.
    pub fn is_read_only(&self) -> bool {
        self.linked_request_id.is_some()
    }
}

/// Data required to create a new file or image entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileEntry {
    /// The file name (including extension).
    pub name: String,
    /// The containing folder's virtual path.
    pub parent_path: VirtualPath,
    /// The full object-store key.
    pub storage_key: String,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Optional document-request back-reference.
    pub linked_request_id: Option<Uuid>,
}

/// A partial update applied to an existing index row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New display name.
    pub name: Option<String>,
    /// New object-store key.
    pub storage_key: Option<String>,
}
