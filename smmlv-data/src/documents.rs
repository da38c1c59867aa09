//! CSV loader for documents and their folders.
//!
//! Header: `id,name,folder,expiration_date`. An empty `folder` means the
//! document sits outside any folder; an empty `expiration_date` means it
//! never expires. Folders are created from the distinct folder names, with
//! ids assigned from 1 in first-seen order.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use smmlv_core::calculations::common::parse_date;
use smmlv_core::{Document, Folder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentLoadError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `row` is 1-based, header excluded.
    #[error("invalid expiration date '{value}' on row {row}")]
    InvalidDate { value: String, row: usize },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: i64,
    name: String,
    folder: Option<String>,
    expiration_date: Option<String>,
}

/// Documents together with the folders they reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    pub folders: Vec<Folder>,
    pub documents: Vec<Document>,
}

pub fn load_from_str(input: &str) -> Result<DocumentSet, DocumentLoadError> {
    load_from_reader(input.as_bytes())
}

pub fn load_from_reader<R: Read>(input: R) -> Result<DocumentSet, DocumentLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut set = DocumentSet::default();
    let mut folder_ids: HashMap<String, i64> = HashMap::new();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;

        let folder_id = match row.folder.filter(|f| !f.is_empty()) {
            Some(name) => {
                let next_id = set.folders.len() as i64 + 1;
                let id = *folder_ids.entry(name.clone()).or_insert_with(|| {
                    set.folders.push(Folder { id: next_id, name });
                    next_id
                });
                Some(id)
            }
            None => None,
        };

        let expiration_date = match row.expiration_date.filter(|d| !d.is_empty()) {
            Some(value) => Some(
                parse_date(&value).ok_or(DocumentLoadError::InvalidDate { value, row: idx + 1 })?,
            ),
            None => None,
        };

        set.documents.push(Document {
            id: row.id,
            folder_id,
            name: row.name,
            expiration_date,
        });
    }

    Ok(set)
}

pub fn load_from_file(path: &Path) -> Result<DocumentSet, DocumentLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DocumentLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
