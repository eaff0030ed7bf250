//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{
        BookInstance, CreateInstance, InstanceDetails, LoanStatus, UpdateInstance,
    },
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// List all instances ordered by due date
    pub async fn list(&self) -> AppResult<Vec<InstanceDetails>> {
        self.fetch_details("", None).await
    }

    /// On-loan instances borrowed by the given user, due date ascending
    pub async fn on_loan_for_user(&self, user_id: i32) -> AppResult<Vec<InstanceDetails>> {
        self.fetch_details("WHERE bi.status = 'o' AND bi.borrower_id = $1", Some(user_id))
            .await
    }

    /// All on-loan instances, due date ascending (librarian view)
    pub async fn on_loan(&self) -> AppResult<Vec<InstanceDetails>> {
        self.fetch_details("WHERE bi.status = 'o'", None).await
    }

    async fn fetch_details(
        &self,
        where_clause: &str,
        user_id: Option<i32>,
    ) -> AppResult<Vec<InstanceDetails>> {
        let query = format!(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back, bi.borrower_id,
                   b.title AS book_title,
                   u.last_name || ', ' || u.first_name AS borrower_name
            FROM book_instances bi
            LEFT JOIN books b ON bi.book_id = b.id
            LEFT JOIN users u ON bi.borrower_id = u.id
            {}
            ORDER BY bi.due_back
            "#,
            where_clause
        );

        let mut builder = sqlx::query(&query);
        if let Some(id) = user_id {
            builder = builder.bind(id);
        }
        let rows = builder.fetch_all(&self.pool).await?;

        let today = chrono::Utc::now().date_naive();

        let mut result = Vec::new();
        for row in rows {
            let due_back: Option<NaiveDate> = row.get("due_back");
            result.push(InstanceDetails {
                id: row.get("id"),
                book_id: row.get("book_id"),
                book_title: row.get("book_title"),
                imprint: row.get("imprint"),
                status: row.get("status"),
                due_back,
                borrower_id: row.get("borrower_id"),
                borrower_name: row.get("borrower_name"),
                is_overdue: due_back.map(|due| due < today).unwrap_or(false),
            });
        }

        Ok(result)
    }

    /// Count all instances
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count available instances
    pub async fn count_available(&self) -> AppResult<i64> {
        self.count_by_status(LoanStatus::Available).await
    }

    /// Count instances with the given status
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Create a new instance. The identifier is generated here and
    /// never changes afterwards.
    pub async fn create(&self, instance: &CreateInstance) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status, due_back, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status)
        .bind(instance.due_back)
        .bind(instance.borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an instance. The identifier itself is immutable.
    pub async fn update(&self, id: Uuid, instance: &UpdateInstance) -> AppResult<BookInstance> {
        let current = self.get_by_id(id).await?;

        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, status = $3, due_back = $4, borrower_id = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(instance.book_id.or(current.book_id))
        .bind(instance.imprint.as_deref().unwrap_or(&current.imprint))
        .bind(instance.status.unwrap_or(current.status))
        .bind(instance.due_back.or(current.due_back))
        .bind(instance.borrower_id.or(current.borrower_id))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Persist a renewed due date
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "UPDATE book_instances SET due_back = $1 WHERE id = $2 RETURNING *",
        )
        .bind(due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Delete an instance
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
