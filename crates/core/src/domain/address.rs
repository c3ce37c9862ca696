use serde::{Deserialize, Serialize};

use super::customer::CustomerId;
use crate::errors::{missing_fields, DomainError};

pub const MISSING_ADDRESS_FIELDS: &str = "All address fields are required";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddressId(pub i64);

impl std::fmt::Display for AddressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialized with the store's column names; the owner key stays `customer_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub customer_id: CustomerId,
    #[serde(rename = "addressLine1")]
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AddressDraft {
    #[serde(rename = "addressLine1")]
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl AddressDraft {
    pub fn try_new(
        address_line1: Option<String>,
        city: Option<String>,
        state: Option<String>,
        pincode: Option<String>,
    ) -> Result<Self, DomainError> {
        let missing = missing_fields([
            ("addressLine1", address_line1.as_deref()),
            ("city", city.as_deref()),
            ("state", state.as_deref()),
            ("pincode", pincode.as_deref()),
        ]);

        match (address_line1, city, state, pincode) {
            (Some(address_line1), Some(city), Some(state), Some(pincode)) if missing.is_empty() => {
                Ok(Self { address_line1, city, state, pincode })
            }
            _ => Err(DomainError::missing(MISSING_ADDRESS_FIELDS, missing)),
        }
    }

    pub fn into_address(self, id: AddressId, customer_id: CustomerId) -> Address {
        Address {
            id,
            customer_id,
            address_line1: self.address_line1,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
        }
    }
}
