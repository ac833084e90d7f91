//! Repository for the `nav_link_override` table.

use navmgr_core::nav_link::Scope;
use navmgr_core::reconcile::{LinkOverride, ModifiedLinks};
use navmgr_core::types::DbId;
use sqlx::PgPool;

use crate::models::nav_link::{
    CreateNavLink, InsertOutcome, ModifiedNavLink, NavLinkFilter, NavLinkListRow, NavLinkRecord,
    ParentOption, UpdateNavLink,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, parent_id, description, url, sort_order, is_default, key, parent_key, \
    enabled, modified, created_at, updated_at";

/// Same columns, qualified with the `a` alias used by self-joins.
const JOINED_COLUMNS: &str = "\
    a.id, a.parent_id, a.description, a.url, a.sort_order, a.is_default, a.key, \
    a.parent_key, a.enabled, a.modified, a.created_at, a.updated_at";

/// Shared filter clause for the admin table (`$1` enabled, `$2` modified,
/// `$3` description substring, already passed through [`escape_like`]).
const FILTER_CLAUSE: &str = "\
    ($1::BOOLEAN IS NULL OR a.enabled = $1) \
    AND ($2::BOOLEAN IS NULL OR a.modified = $2) \
    AND ($3::TEXT IS NULL OR a.description ILIKE '%' || $3 || '%' ESCAPE '\\')";

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Escape `LIKE` metacharacters so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Provides data access for navigation link overrides.
pub struct NavLinkRepo;

impl NavLinkRepo {
    /// Insert a row.
    ///
    /// Default-origin rows are unique per `(key, parent_key)`: when one
    /// already exists nothing is written and its id is returned as
    /// [`InsertOutcome::Existing`].
    pub async fn insert(
        pool: &PgPool,
        input: &CreateNavLink,
    ) -> Result<InsertOutcome, sqlx::Error> {
        let default_key = input.key.as_deref().filter(|_| input.is_default);

        if let Some(key) = default_key {
            if let Some(existing) =
                Self::find_default(pool, key, input.parent_key.as_deref()).await?
            {
                return Ok(InsertOutcome::Existing(existing.id));
            }
        }

        let inserted = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO nav_link_override \
                 (parent_id, description, url, sort_order, is_default, key, parent_key, \
                  enabled, modified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(input.parent_id)
        .bind(&input.description)
        .bind(&input.url)
        .bind(input.sort_order)
        .bind(input.is_default)
        .bind(&input.key)
        .bind(&input.parent_key)
        .bind(input.enabled)
        .bind(input.modified)
        .fetch_one(pool)
        .await;

        match (inserted, default_key) {
            (Ok(id), _) => Ok(InsertOutcome::Inserted(id)),
            // Lost a race with a concurrent import of the same link.
            (Err(sqlx::Error::Database(db_err)), Some(key))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                tracing::debug!(key, "Default nav link inserted concurrently");
                Self::find_default(pool, key, input.parent_key.as_deref())
                    .await?
                    .map(|existing| InsertOutcome::Existing(existing.id))
                    .ok_or(sqlx::Error::RowNotFound)
            }
            (Err(err), _) => Err(err),
        }
    }

    /// Replace the editable columns of a row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNavLink,
    ) -> Result<Option<NavLinkRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE nav_link_override SET \
                 parent_id = $2, \
                 description = $3, \
                 url = $4, \
                 sort_order = $5, \
                 enabled = $6, \
                 modified = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NavLinkRecord>(&query)
            .bind(id)
            .bind(input.parent_id)
            .bind(&input.description)
            .bind(&input.url)
            .bind(input.sort_order)
            .bind(input.enabled)
            .bind(input.modified)
            .fetch_optional(pool)
            .await
    }

    /// Find a row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NavLinkRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nav_link_override WHERE id = $1");
        sqlx::query_as::<_, NavLinkRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a row by key.
    ///
    /// With `parent_key = None` any scope matches and the oldest row wins;
    /// otherwise only rows stored under that parent key are considered.
    pub async fn find_by_key(
        pool: &PgPool,
        key: &str,
        parent_key: Option<&str>,
    ) -> Result<Option<NavLinkRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nav_link_override \
             WHERE key = $1 AND ($2::TEXT IS NULL OR parent_key = $2) \
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, NavLinkRecord>(&query)
            .bind(key)
            .bind(parent_key)
            .fetch_optional(pool)
            .await
    }

    /// Find the default-origin row for exactly `(key, parent_key)`.
    pub async fn find_default(
        pool: &PgPool,
        key: &str,
        parent_key: Option<&str>,
    ) -> Result<Option<NavLinkRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nav_link_override \
             WHERE is_default AND key = $1 AND parent_key IS NOT DISTINCT FROM $2 \
             ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, NavLinkRecord>(&query)
            .bind(key)
            .bind(parent_key)
            .fetch_optional(pool)
            .await
    }

    /// Raw modified rows relevant to `scope`, in id order.
    ///
    /// For a section: rows imported under it or currently parented to it.
    /// At top level: rows without a parent, plus rows imported at top level
    /// and since moved into a section, so their default is suppressed there.
    pub async fn list_modified_rows(
        pool: &PgPool,
        scope: &Scope,
    ) -> Result<Vec<ModifiedNavLink>, sqlx::Error> {
        let base = format!(
            "SELECT {JOINED_COLUMNS}, b.key AS current_parent \
             FROM nav_link_override AS a \
             LEFT JOIN nav_link_override AS b ON b.id = a.parent_id \
             WHERE a.modified"
        );
        match scope.parent_key() {
            Some(parent) => {
                let query = format!("{base} AND (a.parent_key = $1 OR b.key = $1) ORDER BY a.id");
                sqlx::query_as::<_, ModifiedNavLink>(&query)
                    .bind(parent)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "{base} AND (a.parent_id IS NULL OR a.parent_key IS NULL) ORDER BY a.id"
                );
                sqlx::query_as::<_, ModifiedNavLink>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Modified rows for `scope`, grouped by stored parent key then link key.
    pub async fn list_modified(pool: &PgPool, scope: &Scope) -> Result<ModifiedLinks, sqlx::Error> {
        let rows = Self::list_modified_rows(pool, scope).await?;
        Ok(rows.into_iter().map(LinkOverride::from).collect())
    }

    /// One page of the admin table, ordered so children follow their parent's
    /// position.
    pub async fn list_page(
        pool: &PgPool,
        filter: &NavLinkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NavLinkListRow>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.description, b.description AS parent_description, a.url, \
                    a.sort_order, a.enabled, a.modified \
             FROM nav_link_override AS a \
             LEFT JOIN nav_link_override AS b ON b.id = a.parent_id \
             WHERE {FILTER_CLAUSE} \
             ORDER BY COALESCE(b.sort_order, a.sort_order), a.parent_id NULLS FIRST, \
                      a.sort_order, a.id \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, NavLinkListRow>(&query)
            .bind(filter.enabled)
            .bind(filter.modified)
            .bind(filter.description.as_deref().map(escape_like))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Number of rows matching `filter`.
    pub async fn count(pool: &PgPool, filter: &NavLinkFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM nav_link_override AS a WHERE {FILTER_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.enabled)
            .bind(filter.modified)
            .bind(filter.description.as_deref().map(escape_like))
            .fetch_one(pool)
            .await
    }

    /// Top-level rows a link may be moved under, excluding `exclude_id`.
    pub async fn list_parents(
        pool: &PgPool,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<ParentOption>, sqlx::Error> {
        sqlx::query_as::<_, ParentOption>(
            "SELECT id, description FROM nav_link_override \
             WHERE parent_id IS NULL AND ($1::BIGINT IS NULL OR id <> $1) \
             ORDER BY sort_order, id",
        )
        .bind(exclude_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_quotes_metacharacters() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
