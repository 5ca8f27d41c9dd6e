//! Migration of resource rows keyed by an older scheme.
//!
//! Earlier deployments stored the raw or normalized post URL as the key.
//! Rekeying resolves each such key to its activity ID so lookups by
//! [`crate::resolver::resolve`] find them again. Rows are never merged or
//! dropped: a row whose key cannot be resolved, or whose activity ID is
//! already taken, is left as it is and reported.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{Resource, Result, Store};
use crate::resolver::{ActivityKey, resolve};

/// A row whose key was (or would be) rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RekeyedRow {
    pub id: i64,
    pub old_key: String,
    pub new_key: String,
}

/// A row whose activity ID is already used by another row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RekeyConflict {
    pub id: i64,
    pub old_key: String,
    pub new_key: String,
    /// Row that already holds `new_key`.
    pub holder_id: i64,
}

/// Outcome of a rekey pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RekeyReport {
    /// Rows already keyed by activity ID.
    pub already_canonical: usize,
    pub rekeyed: Vec<RekeyedRow>,
    pub conflicts: Vec<RekeyConflict>,
    /// Rows whose key holds no activity ID, as `(id, key)`.
    pub unresolvable: Vec<(i64, String)>,
    /// True when nothing was written.
    pub dry_run: bool,
}

impl RekeyReport {
    /// Returns true when some rows still need manual attention.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        !self.conflicts.is_empty() || !self.unresolvable.is_empty()
    }
}

impl Store {
    /// Rewrites URL-shaped keys to activity IDs inside one transaction.
    ///
    /// With `dry_run`, computes the same report and rolls back.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Database`] if reading or updating fails;
    /// the transaction is rolled back in that case.
    #[instrument(skip(self))]
    pub async fn rekey_resources(&self, dry_run: bool) -> Result<RekeyReport> {
        let mut tx = self.db.pool().begin().await?;

        let rows = sqlx::query_as::<_, Resource>(
            "SELECT id, post_key, resource_name, resource_link FROM post_resource ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut report = RekeyReport {
            dry_run,
            ..RekeyReport::default()
        };
        let mut taken: HashMap<String, i64> = rows
            .iter()
            .filter(|row| ActivityKey::is_canonical(&row.post_key))
            .map(|row| (row.post_key.clone(), row.id))
            .collect();

        for row in rows {
            if ActivityKey::is_canonical(&row.post_key) {
                report.already_canonical += 1;
                continue;
            }

            let Ok(key) = resolve(Some(row.post_key.as_str())) else {
                warn!(id = row.id, key = %row.post_key, "stored key has no activity ID");
                report.unresolvable.push((row.id, row.post_key));
                continue;
            };
            let new_key = key.into_string();

            if let Some(&holder_id) = taken.get(&new_key) {
                warn!(id = row.id, holder_id, key = %new_key, "activity ID already registered");
                report.conflicts.push(RekeyConflict {
                    id: row.id,
                    old_key: row.post_key,
                    new_key,
                    holder_id,
                });
                continue;
            }

            sqlx::query("UPDATE post_resource SET post_key = ? WHERE id = ?")
                .bind(&new_key)
                .bind(row.id)
                .execute(&mut *tx)
                .await?;

            taken.insert(new_key.clone(), row.id);
            report.rekeyed.push(RekeyedRow {
                id: row.id,
                old_key: row.post_key,
                new_key,
            });
        }

        if dry_run {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
        }

        info!(
            rekeyed = report.rekeyed.len(),
            conflicts = report.conflicts.len(),
            unresolvable = report.unresolvable.len(),
            already_canonical = report.already_canonical,
            dry_run,
            "rekey pass finished"
        );
        Ok(report)
    }
}
