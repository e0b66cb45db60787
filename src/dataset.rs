use crate::results::ListingRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Records accumulated over one browsing session.
///
/// `seen_ids` always equals the set of record ids; records are only appended,
/// and only when their id has not been seen before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionDataset {
    records: Vec<ListingRecord>,
    seen_ids: HashSet<String>,
    category_label: String,
    last_page_id: Option<String>,
}

/// Result of merging a batch into a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Records in the incoming batch
    pub incoming: usize,
    /// Records appended to the dataset
    pub added: usize,
}

impl MergeOutcome {
    /// Nothing new was admitted; callers skip recompute and refresh
    pub fn is_noop(&self) -> bool {
        self.added == 0
    }
}

impl SessionDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from already-deduplicated records. Later duplicates are dropped.
    pub fn from_records(
        records: Vec<ListingRecord>,
        category_label: String,
        last_page_id: Option<String>,
    ) -> Self {
        let mut dataset = Self {
            category_label,
            last_page_id,
            ..Self::default()
        };
        dataset.merge(records);
        dataset
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// Ids in discovery order
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id().to_string()).collect()
    }

    pub fn category_label(&self) -> &str {
        &self.category_label
    }

    /// Last write wins; an empty label keeps the previous one
    pub fn set_category_label(&mut self, label: &str) {
        if !label.is_empty() {
            self.category_label = label.to_string();
        }
    }

    pub fn last_page_id(&self) -> Option<&str> {
        self.last_page_id.as_deref()
    }

    pub fn set_last_page_id(&mut self, page_id: &str) {
        self.last_page_id = Some(page_id.to_string());
    }

    /// Append every incoming record whose id has not been seen, keeping the
    /// incoming order. First-seen wins: a repeated id never replaces the stored record.
    pub fn merge(&mut self, incoming: Vec<ListingRecord>) -> MergeOutcome {
        let incoming_count = incoming.len();
        let mut added = 0;

        for record in incoming {
            if self.seen_ids.contains(record.id()) {
                ::log::trace!("Skipping already known listing {}", record.id());
                continue;
            }
            self.seen_ids.insert(record.id().to_string());
            self.records.push(record);
            added += 1;
        }

        ::log::debug!(
            "Merged {} incoming records: {} new, {} total",
            incoming_count,
            added,
            self.records.len()
        );

        MergeOutcome {
            incoming: incoming_count,
            added,
        }
    }
}

/// Merge `incoming` into a copy of `existing`
pub fn merge(
    existing: &SessionDataset,
    incoming: Vec<ListingRecord>,
) -> (SessionDataset, MergeOutcome) {
    let mut merged = existing.clone();
    let outcome = merged.merge(incoming);
    (merged, outcome)
}

/// Session state as written to the key-value store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub properties: Vec<ListingRecord>,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub scraped_property_ids: Vec<String>,
    #[serde(default)]
    pub last_page_id: Option<String>,
}

impl From<&SessionDataset> for PersistedSession {
    fn from(dataset: &SessionDataset) -> Self {
        Self {
            properties: dataset.records.clone(),
            property_type: dataset.category_label.clone(),
            scraped_property_ids: dataset.ids(),
            last_page_id: dataset.last_page_id.clone(),
        }
    }
}

impl From<PersistedSession> for SessionDataset {
    fn from(persisted: PersistedSession) -> Self {
        let stored_ids: HashSet<&str> = persisted
            .scraped_property_ids
            .iter()
            .map(String::as_str)
            .collect();
        let record_ids: HashSet<&str> = persisted.properties.iter().map(|r| r.id()).collect();
        if stored_ids != record_ids {
            ::log::warn!(
                "Stored id list ({} ids) does not match stored records ({} ids), rebuilding from records",
                stored_ids.len(),
                record_ids.len()
            );
        }

        SessionDataset::from_records(
            persisted.properties,
            persisted.property_type,
            persisted.last_page_id,
        )
    }
}
