use sqlx::Row;

use rolodex_core::domain::address::{Address, AddressDraft, AddressId};
use rolodex_core::domain::customer::CustomerId;

use super::{AddressRepository, RepositoryError};
use crate::DbPool;

pub struct SqlAddressRepository {
    pool: DbPool,
}

impl SqlAddressRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_address(row: &sqlx::sqlite::SqliteRow) -> Result<Address, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let customer_id: i64 =
        row.try_get("customer_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let address_line1: String =
        row.try_get("addressLine1").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let city: String = row.try_get("city").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let state: String = row.try_get("state").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let pincode: String =
        row.try_get("pincode").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Address {
        id: AddressId(id),
        customer_id: CustomerId(customer_id),
        address_line1,
        city,
        state,
        pincode,
    })
}

#[async_trait::async_trait]
impl AddressRepository for SqlAddressRepository {
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, customer_id, addressLine1, city, state, pincode
             FROM addresses WHERE customer_id = ? ORDER BY id",
        )
        .bind(customer_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_address).collect::<Result<Vec<_>, _>>()
    }

    async fn create(
        &self,
        customer_id: CustomerId,
        draft: &AddressDraft,
    ) -> Result<AddressId, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO addresses (customer_id, addressLine1, city, state, pincode)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(customer_id.0)
        .bind(&draft.address_line1)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.pincode)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(AddressId(result.last_insert_rowid()))
    }

    async fn update(&self, id: AddressId, draft: &AddressDraft) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE addresses SET addressLine1 = ?, city = ?, state = ?, pincode = ? WHERE id = ?",
        )
        .bind(&draft.address_line1)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.pincode)
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: AddressId) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM addresses WHERE id = ?").bind(id.0).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }
}
