use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

use super::error::CandidateStoreError;
use super::model::CandidateRecord;
use super::store::CandidateStore;

/// In-memory candidate store for tests and examples.
#[derive(Default)]
pub struct InMemoryCandidateStore {
    records: RwLock<HashMap<String, CandidateRecord>>,
    org_members: RwLock<HashMap<String, HashSet<String>>>,
    unreachable: RwLock<bool>,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a candidate record.
    pub fn insert(&self, record: CandidateRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    /// Assigns a candidate to an organization.
    pub fn assign_org(&self, candidate_id: &str, org_id: &str) {
        self.org_members
            .write()
            .entry(org_id.to_string())
            .or_default()
            .insert(candidate_id.to_string());
    }

    /// Forces every subsequent call to fail with `ConnectionFailed`.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.write() = unreachable;
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check_reachable(&self) -> Result<(), CandidateStoreError> {
        if *self.unreachable.read() {
            return Err(CandidateStoreError::ConnectionFailed {
                message: "mock store marked unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn get_by_id(&self, id: &str) -> Result<CandidateRecord, CandidateStoreError> {
        self.check_reachable()?;
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| CandidateStoreError::NotFound { id: id.to_string() })
    }

    async fn search_by_name(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError> {
        self.check_reachable()?;
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.records.read();
        let mut hits: Vec<CandidateRecord> = records
            .values()
            .filter(|r| r.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        // Deterministic order for tests.
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CandidateRecord>, CandidateStoreError> {
        self.check_reachable()?;
        let needle = email.trim().to_lowercase();
        Ok(self
            .records
            .read()
            .values()
            .find(|r| {
                r.email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase() == needle)
            })
            .cloned())
    }

    async fn filter_by_org(
        &self,
        ids: &[String],
        org_id: &str,
    ) -> Result<Vec<String>, CandidateStoreError> {
        self.check_reachable()?;
        let orgs = self.org_members.read();
        let members = match orgs.get(org_id) {
            Some(m) => m,
            None => return Ok(Vec::new()),
        };
        Ok(ids.iter().filter(|id| members.contains(*id)).cloned().collect())
    }
}
