use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use rolodex_core::domain::address::{Address, AddressDraft, AddressId};
use rolodex_core::domain::customer::CustomerId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiState, ChangeSummary};
use crate::error::{ApiError, ADDRESS_NOT_FOUND, CUSTOMER_NOT_FOUND};

#[derive(Debug, Default, Deserialize)]
pub struct AddressPayload {
    #[serde(rename = "addressLine1")]
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl TryFrom<AddressPayload> for AddressDraft {
    type Error = ApiError;

    fn try_from(payload: AddressPayload) -> Result<Self, Self::Error> {
        Ok(AddressDraft::try_new(payload.address_line1, payload.city, payload.state, payload.pincode)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCreated {
    pub message: &'static str,
    pub address_id: AddressId,
}

/// Unknown customers yield an empty list rather than a 404.
pub async fn list_addresses(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Address>>, ApiError> {
    let Path(customer_id) = path?;

    Ok(Json(state.addresses.list_for_customer(CustomerId(customer_id)).await?))
}

pub async fn create_address(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddressPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AddressCreated>), ApiError> {
    let Path(customer_id) = path?;
    let Json(payload) = payload?;
    let draft = AddressDraft::try_from(payload)?;
    let customer_id = CustomerId(customer_id);

    if state.customers.find_by_id(customer_id).await?.is_none() {
        return Err(ApiError::NotFound(CUSTOMER_NOT_FOUND));
    }

    let address_id = state.addresses.create(customer_id, &draft).await?;
    info!(
        event_name = "api.address.created",
        customer_id = customer_id.0,
        address_id = address_id.0,
        "address created"
    );

    Ok((StatusCode::CREATED, Json(AddressCreated { message: "Address added", address_id })))
}

/// Succeeds with `changes: 0` when the address does not exist.
pub async fn update_address(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddressPayload>, JsonRejection>,
) -> Result<Json<ChangeSummary>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let draft = AddressDraft::try_from(payload)?;

    let changes = state.addresses.update(AddressId(id), &draft).await?;
    info!(event_name = "api.address.updated", address_id = id, changes, "address update applied");

    Ok(Json(ChangeSummary { message: "Address updated", changes }))
}

pub async fn delete_address(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ChangeSummary>, ApiError> {
    let Path(id) = path?;

    let changes = state.addresses.delete(AddressId(id)).await?;
    if changes == 0 {
        return Err(ApiError::NotFound(ADDRESS_NOT_FOUND));
    }
    info!(event_name = "api.address.deleted", address_id = id, "address deleted");

    Ok(Json(ChangeSummary { message: "Address deleted", changes }))
}
