//! Resource and submission persistence.
//!
//! # Overview
//!
//! - [`Store`] - `SQLite`-backed operations over both tables
//! - [`ResourceRepository`] - async seam the HTTP layer depends on
//! - [`validate_resource_input`] / [`validate_submission`] - checks run before writes
//! - [`StoreError`] - operation error types
//!
//! # Example
//!
//! ```ignore
//! use leadgate_core::{Database, Store, ResourceInput};
//!
//! let store = Store::new(Database::new_in_memory().await?);
//! let resource = store.create_resource(&ResourceInput {
//!     post_url: "https://www.linkedin.com/posts/me_guide-activity-42-x".into(),
//!     resource_name: "Guide".into(),
//!     resource_link: "https://example.com/guide.pdf".into(),
//! }).await?;
//! assert_eq!(resource.post_key, "42");
//! ```

mod error;
mod models;
mod rekey;
mod repository;
mod validation;

pub use error::{DbErrorKind, Entity, StoreError};
pub use models::{
    DEFAULT_SUBMISSION_PAGE, MAX_SUBMISSION_PAGE, NewSubmission, Resource, ResourceInput,
    Submission, SubmissionQuery,
};
pub use rekey::{RekeyConflict, RekeyReport, RekeyedRow};
pub use repository::ResourceRepository;
pub use validation::{ValidResource, validate_resource_input, validate_submission};

use tracing::{debug, info, instrument};

use crate::db::Database;
use crate::resolver::ActivityKey;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Returns `Ok(())` if at least one row was affected; otherwise [`StoreError::NotFound`].
fn check_affected(entity: Entity, id: i64, rows_affected: u64) -> Result<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound { entity, id })
    } else {
        Ok(())
    }
}

/// Storage for registered resources and the submission log.
#[derive(Debug, Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    /// Creates a store over an opened, migrated database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Looks up the resource registered for a post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn find_resource_by_key(&self, key: &ActivityKey) -> Result<Option<Resource>> {
        let resource = sqlx::query_as::<_, Resource>(
            "SELECT id, post_key, resource_name, resource_link FROM post_resource WHERE post_key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(self.db.pool())
        .await?;
        debug!(found = resource.is_some(), "resource lookup");
        Ok(resource)
    }

    /// Fetches one resource by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get_resource(&self, id: i64) -> Result<Option<Resource>> {
        let resource = sqlx::query_as::<_, Resource>(
            "SELECT id, post_key, resource_name, resource_link FROM post_resource WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(resource)
    }

    /// Lists all resources ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        let resources = sqlx::query_as::<_, Resource>(
            "SELECT id, post_key, resource_name, resource_link FROM post_resource ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(resources)
    }

    /// Validates and inserts a resource.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] before touching the database when the
    /// input is rejected, [`StoreError::DuplicateKey`] when the post already
    /// has a resource, or [`StoreError::Database`] if the insert fails.
    #[instrument(skip(self, input), fields(post_url = %input.post_url))]
    pub async fn create_resource(&self, input: &ResourceInput) -> Result<Resource> {
        let valid = validate_resource_input(input)?;
        let key = valid.post_key.as_str();

        let result = sqlx::query(
            "INSERT INTO post_resource (post_key, resource_name, resource_link) VALUES (?, ?, ?)",
        )
        .bind(key)
        .bind(&valid.resource_name)
        .bind(&valid.resource_link)
        .execute(self.db.pool())
        .await
        .map_err(|e| StoreError::from_write(e, key))?;

        let id = result.last_insert_rowid();
        info!(id, key, "resource registered");
        Ok(Resource {
            id,
            post_key: valid.post_key.into_string(),
            resource_name: valid.resource_name,
            resource_link: valid.resource_link,
        })
    }

    /// Validates and replaces every field of an existing resource.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`], [`StoreError::NotFound`],
    /// [`StoreError::DuplicateKey`] or [`StoreError::Database`].
    #[instrument(skip(self, input), fields(post_url = %input.post_url))]
    pub async fn update_resource(&self, id: i64, input: &ResourceInput) -> Result<Resource> {
        let valid = validate_resource_input(input)?;
        let key = valid.post_key.as_str();

        let result = sqlx::query(
            "UPDATE post_resource SET post_key = ?, resource_name = ?, resource_link = ? WHERE id = ?",
        )
        .bind(key)
        .bind(&valid.resource_name)
        .bind(&valid.resource_link)
        .bind(id)
        .execute(self.db.pool())
        .await
        .map_err(|e| StoreError::from_write(e, key))?;
        check_affected(Entity::Resource, id, result.rows_affected())?;

        info!(id, key, "resource updated");
        Ok(Resource {
            id,
            post_key: valid.post_key.into_string(),
            resource_name: valid.resource_name,
            resource_link: valid.resource_link,
        })
    }

    /// Deletes a resource. Past submissions keep the resource name they recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::Database`].
    #[instrument(skip(self))]
    pub async fn delete_resource(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM post_resource WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        check_affected(Entity::Resource, id, result.rows_affected())?;
        info!(id, "resource deleted");
        Ok(())
    }

    /// Validates and appends a submission, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] or [`StoreError::Database`].
    #[instrument(skip(self, submission), fields(resource = ?submission.requested_resource_name))]
    pub async fn record_submission(&self, submission: &NewSubmission<'_>) -> Result<i64> {
        validate_submission(submission)?;

        let result = sqlx::query(
            r"INSERT INTO submission (
                name,
                email,
                position,
                company_college,
                requested_resource_name
            ) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(submission.name.trim())
        .bind(submission.email.trim())
        .bind(submission.position.map(str::trim))
        .bind(submission.company_college.map(str::trim))
        .bind(submission.requested_resource_name)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "submission recorded");
        Ok(id)
    }

    /// Lists submissions newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_submissions(&self, query: &SubmissionQuery) -> Result<Vec<Submission>> {
        let query = query.clamped();
        let rows = sqlx::query_as::<_, Submission>(
            r"SELECT id, created_at, name, email, position, company_college, requested_resource_name
              FROM submission
              ORDER BY created_at DESC, id DESC
              LIMIT ? OFFSET ?",
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }

    /// Deletes one submission.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::Database`].
    #[instrument(skip(self))]
    pub async fn delete_submission(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM submission WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        check_affected(Entity::Submission, id, result.rows_affected())?;
        info!(id, "submission deleted");
        Ok(())
    }
}
