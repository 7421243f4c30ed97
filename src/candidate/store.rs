use async_trait::async_trait;

use super::error::CandidateStoreError;
use super::model::CandidateRecord;

/// Read interface to the externally-owned candidate store.
///
/// The pipeline only reads; profile mutation and its lifecycle live with the
/// upstream owner. All methods are idempotent reads and safe to retry on
/// connection failures.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Fetches a candidate by id.
    async fn get_by_id(&self, id: &str) -> Result<CandidateRecord, CandidateStoreError>;

    /// Case-insensitive name containment search, capped at `limit`.
    async fn search_by_name(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, CandidateStoreError>;

    /// Exact email equality lookup.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CandidateRecord>, CandidateStoreError>;

    /// Returns the subset of `ids` that belong to `org_id`.
    ///
    /// Tenant scoping is applied here, after the vector query, because the
    /// vector store does not index on organization.
    async fn filter_by_org(
        &self,
        ids: &[String],
        org_id: &str,
    ) -> Result<Vec<String>, CandidateStoreError>;
}
