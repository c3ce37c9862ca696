use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use rolodex_core::domain::customer::{Customer, CustomerDraft, CustomerId};
use rolodex_core::domain::pagination::{CustomerFilter, Page, PageInfo, PageRequest};

use super::{CustomerRepository, RepositoryError};
use crate::DbPool;

const CUSTOMER_COLUMNS: &str = "c.id, c.firstName, c.lastName, c.phoneNumber";

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let first_name: String =
        row.try_get("firstName").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let last_name: String =
        row.try_get("lastName").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let phone_number: String =
        row.try_get("phoneNumber").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Customer { id: CustomerId(id), first_name, last_name, phone_number })
}

/// Wraps a needle in `%` wildcards, escaping LIKE metacharacters so it matches literally.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Appends the filter predicate shared by the count and data queries.
///
/// Matching addresses are reduced to their owning customer ids before the join with
/// `customers`, so a customer with several matching addresses still yields one row.
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &CustomerFilter) {
    if filter.is_empty() {
        return;
    }

    builder.push(" WHERE c.id IN (SELECT a.customer_id FROM addresses a WHERE ");
    for (index, (column, needle)) in filter.terms().into_iter().enumerate() {
        if index > 0 {
            builder.push(" AND ");
        }
        builder.push(format!("a.{column} LIKE "));
        builder.push_bind(like_pattern(needle));
        builder.push(" ESCAPE '\\'");
    }
    builder.push(")");
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn list(
        &self,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> Result<Page<Customer>, RepositoryError> {
        // Count and page share one read transaction so the total matches the window.
        let mut tx = self.pool.begin().await?;

        let mut count_query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM customers c");
        push_filter(&mut count_query, filter);
        let total_records: i64 =
            count_query.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut data_query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {CUSTOMER_COLUMNS} FROM customers c"));
        push_filter(&mut data_query, filter);
        data_query.push(" ORDER BY c.firstName, c.lastName, c.id LIMIT ");
        data_query.push_bind(i64::from(page.limit));
        data_query.push(" OFFSET ");
        data_query.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows = data_query.build().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        let data = rows.iter().map(row_to_customer).collect::<Result<Vec<_>, _>>()?;
        let total_records = u64::try_from(total_records)
            .map_err(|_| RepositoryError::Decode(format!("negative count {total_records}")))?;

        debug!(
            event_name = "db.customer.list",
            filtered = !filter.is_empty(),
            page = page.page,
            limit = page.limit,
            total_records,
            returned = data.len(),
            "customer page loaded"
        );

        Ok(Page { data, pagination: PageInfo::new(page, total_records) })
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            "SELECT c.id, c.firstName, c.lastName, c.phoneNumber FROM customers c WHERE c.id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO customers (firstName, lastName, phoneNumber) VALUES (?, ?, ?)",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.phone_number)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(CustomerId(result.last_insert_rowid()))
    }

    async fn update(&self, id: CustomerId, draft: &CustomerDraft) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE customers SET firstName = ?, lastName = ?, phoneNumber = ? WHERE id = ?",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.phone_number)
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: CustomerId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
