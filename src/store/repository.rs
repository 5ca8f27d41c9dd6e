//! Repository seam for resource and submission operations.
//!
//! Request handlers depend on `dyn ResourceRepository` so the storage handle is
//! injected at startup rather than reached through a global.

use async_trait::async_trait;

use super::{NewSubmission, Resource, ResourceInput, Result, Store, Submission, SubmissionQuery};
use crate::resolver::ActivityKey;

/// Data-access contract for the request flow and the admin API.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Looks up the resource registered for a post.
    async fn find_resource_by_key(&self, key: &ActivityKey) -> Result<Option<Resource>>;

    /// Appends a submission row.
    async fn record_submission(&self, submission: &NewSubmission<'_>) -> Result<i64>;

    /// Lists all resources.
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Fetches one resource.
    async fn get_resource(&self, id: i64) -> Result<Option<Resource>>;

    /// Validates and inserts a resource.
    async fn create_resource(&self, input: &ResourceInput) -> Result<Resource>;

    /// Validates and replaces a resource.
    async fn update_resource(&self, id: i64, input: &ResourceInput) -> Result<Resource>;

    /// Deletes a resource.
    async fn delete_resource(&self, id: i64) -> Result<()>;

    /// Lists submissions newest first.
    async fn list_submissions(&self, query: &SubmissionQuery) -> Result<Vec<Submission>>;

    /// Deletes a submission.
    async fn delete_submission(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl ResourceRepository for Store {
    async fn find_resource_by_key(&self, key: &ActivityKey) -> Result<Option<Resource>> {
        Store::find_resource_by_key(self, key).await
    }

    async fn record_submission(&self, submission: &NewSubmission<'_>) -> Result<i64> {
        Store::record_submission(self, submission).await
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Store::list_resources(self).await
    }

    async fn get_resource(&self, id: i64) -> Result<Option<Resource>> {
        Store::get_resource(self, id).await
    }

    async fn create_resource(&self, input: &ResourceInput) -> Result<Resource> {
        Store::create_resource(self, input).await
    }

    async fn update_resource(&self, id: i64, input: &ResourceInput) -> Result<Resource> {
        Store::update_resource(self, id, input).await
    }

    async fn delete_resource(&self, id: i64) -> Result<()> {
        Store::delete_resource(self, id).await
    }

    async fn list_submissions(&self, query: &SubmissionQuery) -> Result<Vec<Submission>> {
        Store::list_submissions(self, query).await
    }

    async fn delete_submission(&self, id: i64) -> Result<()> {
        Store::delete_submission(self, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::Database;
    use crate::resolver::resolve;

    #[tokio::test]
    async fn test_repository_trait_object_delegates_to_store() {
        let store = Store::new(Database::new_in_memory().await.unwrap());
        let repo: Arc<dyn ResourceRepository> = Arc::new(store);

        repo.create_resource(&ResourceInput {
            post_url: "urn:li:activity:31".to_string(),
            resource_name: "Deck".to_string(),
            resource_link: "https://example.com/deck.pdf".to_string(),
        })
        .await
        .unwrap();

        let key = resolve(Some("https://www.linkedin.com/posts/me-activity-31-x")).unwrap();
        let found = repo.find_resource_by_key(&key).await.unwrap();
        assert_eq!(found.map(|r| r.resource_name).as_deref(), Some("Deck"));
    }
}
