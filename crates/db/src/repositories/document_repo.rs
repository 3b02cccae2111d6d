//! Repository for the `inspected_documents` table.

use futures::stream::BoxStream;
use grua_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::document::{CreateDocument, InspectedDocument};

/// Column list for `inspected_documents` queries.
const COLUMNS: &str = "id, employee_id, kind, name, valid_until, created_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
    ) -> Result<InspectedDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspected_documents (employee_id, kind, name, valid_until) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectedDocument>(&query)
            .bind(input.employee_id)
            .bind(&input.kind)
            .bind(&input.name)
            .bind(input.valid_until)
            .fetch_one(pool)
            .await
    }

    /// List an employee's documents, soonest expiry first.
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<InspectedDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspected_documents \
             WHERE employee_id = $1 \
             ORDER BY valid_until ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, InspectedDocument>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Stream every document whose validity ends on or before `horizon`,
    /// including already-expired ones.
    pub fn stream_expiring_before(
        pool: &PgPool,
        horizon: Date,
    ) -> BoxStream<'_, Result<InspectedDocument, sqlx::Error>> {
        sqlx::query_as::<_, InspectedDocument>(
            "SELECT id, employee_id, kind, name, valid_until, created_at \
             FROM inspected_documents \
             WHERE valid_until IS NOT NULL AND valid_until <= $1 \
             ORDER BY valid_until ASC, id ASC",
        )
        .bind(horizon)
        .fetch(pool)
    }
}
