//! Document expiration notices.
//!
//! A document is *expired* once its expiration date is in the past and
//! *expiring soon* from `window_days` days before that date up to and
//! including the date itself.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Document, Folder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpirationStatus {
    NoExpiry,
    Valid { days_remaining: i64 },
    ExpiringSoon { days_remaining: i64 },
    Expired { days_overdue: i64 },
}

impl ExpirationStatus {
    /// True for the statuses that produce a notice.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::ExpiringSoon { .. } | Self::Expired { .. })
    }
}

/// Classifies one expiration date relative to `today`.
pub fn expiration_status(
    expiration_date: Option<NaiveDate>,
    today: NaiveDate,
    window_days: i64,
) -> ExpirationStatus {
    let Some(date) = expiration_date else {
        return ExpirationStatus::NoExpiry;
    };
    let days_remaining = (date - today).num_days();
    if days_remaining < 0 {
        ExpirationStatus::Expired {
            days_overdue: -days_remaining,
        }
    } else if days_remaining <= window_days {
        ExpirationStatus::ExpiringSoon { days_remaining }
    } else {
        ExpirationStatus::Valid { days_remaining }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationNotice {
    pub document_id: i64,
    pub document_name: String,
    pub folder_name: Option<String>,
    pub expiration_date: NaiveDate,
    pub status: ExpirationStatus,
}

/// Counts of documents needing attention inside one folder.
/// `folder_id` is `None` for documents outside any folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderExpirationSummary {
    pub folder_id: Option<i64>,
    pub folder_name: Option<String>,
    pub expired: usize,
    pub expiring_soon: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationMonitor {
    window_days: i64,
}

impl ExpirationMonitor {
    /// Negative windows are treated as zero.
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days: window_days.max(0),
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Expired and expiring-soon documents, ordered by expiration date then id.
    pub fn notices(
        &self,
        documents: &[Document],
        folders: &[Folder],
        today: NaiveDate,
    ) -> Vec<ExpirationNotice> {
        let folder_names = folder_names(folders);

        let mut notices: Vec<ExpirationNotice> = documents
            .iter()
            .filter_map(|doc| {
                let expiration_date = doc.expiration_date?;
                let status = expiration_status(Some(expiration_date), today, self.window_days);
                status.needs_attention().then(|| ExpirationNotice {
                    document_id: doc.id,
                    document_name: doc.name.clone(),
                    folder_name: doc
                        .folder_id
                        .and_then(|id| folder_names.get(&id))
                        .map(|name| name.to_string()),
                    expiration_date,
                    status,
                })
            })
            .collect();

        notices.sort_by(|a, b| {
            a.expiration_date
                .cmp(&b.expiration_date)
                .then(a.document_id.cmp(&b.document_id))
        });
        notices
    }

    /// Per-folder counts, omitting folders with nothing to report, ordered by
    /// folder name with the "no folder" bucket first.
    pub fn folder_summaries(
        &self,
        documents: &[Document],
        folders: &[Folder],
        today: NaiveDate,
    ) -> Vec<FolderExpirationSummary> {
        let names = folder_names(folders);
        let mut buckets: BTreeMap<(Option<String>, Option<i64>), (usize, usize)> = BTreeMap::new();

        for doc in documents {
            let status = expiration_status(doc.expiration_date, today, self.window_days);
            if !status.needs_attention() {
                continue;
            }
            let name = doc
                .folder_id
                .and_then(|id| names.get(&id))
                .map(|name| name.to_string());
            let counts = buckets.entry((name, doc.folder_id)).or_default();
            match status {
                ExpirationStatus::Expired { .. } => counts.0 += 1,
                _ => counts.1 += 1,
            }
        }

        buckets
            .into_iter()
            .map(
                |((folder_name, folder_id), (expired, expiring_soon))| FolderExpirationSummary {
                    folder_id,
                    folder_name,
                    expired,
                    expiring_soon,
                },
            )
            .collect()
    }
}

fn folder_names(folders: &[Folder]) -> HashMap<i64, &str> {
    folders.iter().map(|f| (f.id, f.name.as_str())).collect()
}
