use serde::{Deserialize, Serialize};

use crate::errors::{missing_fields, DomainError};

pub const MISSING_CUSTOMER_FIELDS: &str = "Missing required fields";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// Full set of writable customer fields, all present and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl CustomerDraft {
    pub fn try_new(
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
    ) -> Result<Self, DomainError> {
        let missing = missing_fields([
            ("firstName", first_name.as_deref()),
            ("lastName", last_name.as_deref()),
            ("phoneNumber", phone_number.as_deref()),
        ]);

        match (first_name, last_name, phone_number) {
            (Some(first_name), Some(last_name), Some(phone_number)) if missing.is_empty() => {
                Ok(Self { first_name, last_name, phone_number })
            }
            _ => Err(DomainError::missing(MISSING_CUSTOMER_FIELDS, missing)),
        }
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, CustomerDraft, CustomerId, MISSING_CUSTOMER_FIELDS};
    use crate::errors::DomainError;

    #[test]
    fn draft_requires_every_field() {
        let error = CustomerDraft::try_new(Some("Ann".to_string()), None, Some(String::new()))
            .expect_err("draft without last name and phone should fail");

        assert_eq!(
            error,
            DomainError::missing(MISSING_CUSTOMER_FIELDS, vec!["lastName", "phoneNumber"])
        );
    }

    #[test]
    fn customer_serializes_with_wire_field_names() {
        let customer = CustomerDraft::try_new(
            Some("Ann".to_string()),
            Some("Lee".to_string()),
            Some("555-0100".to_string()),
        )
        .expect("valid draft")
        .into_customer(CustomerId(1));

        let value = serde_json::to_value(&customer).expect("serialize customer");
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "firstName": "Ann",
                "lastName": "Lee",
                "phoneNumber": "555-0100"
            })
        );

        let decoded: Customer = serde_json::from_value(value).expect("deserialize customer");
        assert_eq!(decoded, customer);
    }
}
