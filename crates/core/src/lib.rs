pub mod config;
pub mod domain;
pub mod errors;

pub use domain::address::{Address, AddressDraft, AddressId};
pub use domain::customer::{Customer, CustomerDraft, CustomerId};
pub use domain::pagination::{CustomerFilter, Page, PageInfo, PageRequest};
pub use errors::DomainError;
