use async_trait::async_trait;
use thiserror::Error;

use rolodex_core::domain::address::{Address, AddressDraft, AddressId};
use rolodex_core::domain::customer::{Customer, CustomerDraft, CustomerId};
use rolodex_core::domain::pagination::{CustomerFilter, Page, PageRequest};

pub mod address;
pub mod customer;

pub use address::SqlAddressRepository;
pub use customer::SqlCustomerRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("referenced row does not exist: {0}")]
    MissingReference(String),
}

impl RepositoryError {
    /// Splits constraint failures raised by INSERT/UPDATE out of generic database errors.
    pub fn from_write(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                Self::UniqueViolation(db_error.message().to_string())
            }
            sqlx::Error::Database(db_error) if db_error.is_foreign_key_violation() => {
                Self::MissingReference(db_error.message().to_string())
            }
            _ => Self::Database(error),
        }
    }
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Customers owning at least one address that matches every filter term, ordered by
    /// name and windowed to the requested page.
    async fn list(
        &self,
        filter: &CustomerFilter,
        page: PageRequest,
    ) -> Result<Page<Customer>, RepositoryError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerId, RepositoryError>;

    /// Returns the number of rows changed; zero means the id is unknown.
    async fn update(&self, id: CustomerId, draft: &CustomerDraft) -> Result<u64, RepositoryError>;

    async fn delete(&self, id: CustomerId) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError>;

    async fn create(
        &self,
        customer_id: CustomerId,
        draft: &AddressDraft,
    ) -> Result<AddressId, RepositoryError>;

    async fn update(&self, id: AddressId, draft: &AddressDraft) -> Result<u64, RepositoryError>;

    async fn delete(&self, id: AddressId) -> Result<u64, RepositoryError>;
}
