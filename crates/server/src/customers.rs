use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use rolodex_core::domain::customer::{Customer, CustomerDraft, CustomerId};
use rolodex_core::domain::pagination::{CustomerFilter, Page, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiState, ChangeSummary};
use crate::error::{ApiError, CUSTOMER_NOT_FOUND};

/// Raw listing parameters; page and limit are coerced rather than rejected.
///
/// Built from the raw pairs so a repeated key keeps its first value instead of
/// failing deserialization. Unknown keys are ignored.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListCustomersQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListCustomersQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "city" => &mut query.city,
                "state" => &mut query.state,
                "pincode" => &mut query.pincode,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl TryFrom<CustomerPayload> for CustomerDraft {
    type Error = ApiError;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        Ok(CustomerDraft::try_new(payload.first_name, payload.last_name, payload.phone_number)?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub message: &'static str,
    pub customer_id: CustomerId,
}

#[derive(Debug, Serialize)]
pub struct CustomerUpdated {
    pub message: &'static str,
    pub data: CustomerDraft,
    pub changes: u64,
}

pub async fn list_customers(
    State(state): State<ApiState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let Query(pairs) = query?;
    let query = ListCustomersQuery::from_pairs(pairs);
    let filter = CustomerFilter::new(query.city, query.state, query.pincode);
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    Ok(Json(state.customers.list(&filter, page).await?))
}

pub async fn get_customer(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, ApiError> {
    let Path(id) = path?;

    state
        .customers
        .find_by_id(CustomerId(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(CUSTOMER_NOT_FOUND))
}

pub async fn create_customer(
    State(state): State<ApiState>,
    payload: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerCreated>), ApiError> {
    let Json(payload) = payload?;
    let draft = CustomerDraft::try_from(payload)?;

    let customer_id = state.customers.create(&draft).await?;
    info!(
        event_name = "api.customer.created",
        customer_id = customer_id.0,
        "customer created"
    );

    Ok((StatusCode::CREATED, Json(CustomerCreated { message: "Success", customer_id })))
}

pub async fn update_customer(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<Json<CustomerUpdated>, ApiError> {
    let Path(id) = path?;
    let Json(payload) = payload?;
    let draft = CustomerDraft::try_from(payload)?;

    let changes = state.customers.update(CustomerId(id), &draft).await?;
    if changes == 0 {
        return Err(ApiError::NotFound(CUSTOMER_NOT_FOUND));
    }
    info!(event_name = "api.customer.updated", customer_id = id, "customer updated");

    Ok(Json(CustomerUpdated { message: "success", data: draft, changes }))
}

pub async fn delete_customer(
    State(state): State<ApiState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ChangeSummary>, ApiError> {
    let Path(id) = path?;

    let changes = state.customers.delete(CustomerId(id)).await?;
    if changes == 0 {
        return Err(ApiError::NotFound(CUSTOMER_NOT_FOUND));
    }
    info!(event_name = "api.customer.deleted", customer_id = id, "customer deleted");

    Ok(Json(ChangeSummary { message: "deleted", changes }))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, Router};
    use serde_json::{json, Value};

    use super::ListCustomersQuery;
    use crate::api::test_support::{pool, send};
    use crate::api::{router, ApiState};

    async fn app() -> (Router, sqlx::SqlitePool) {
        let pool = pool().await;
        (router(ApiState::from_pool(pool.clone())), pool)
    }

    fn customer(first: &str, last: &str, phone: &str) -> Value {
        json!({ "firstName": first, "lastName": last, "phoneNumber": phone })
    }

    #[test]
    fn query_pairs_keep_first_value_per_key() {
        let pairs = [("page", "2"), ("sort", "name"), ("page", "9"), ("city", "Austin")]
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        assert_eq!(
            ListCustomersQuery::from_pairs(pairs),
            ListCustomersQuery {
                city: Some("Austin".to_string()),
                page: Some("2".to_string()),
                ..ListCustomersQuery::default()
            }
        );
    }

    #[tokio::test]
    async fn created_customer_resolves_to_same_fields() {
        let (app, pool) = app().await;

        let (status, created) =
            send(&app, "POST", "/api/customers", Some(customer("Ann", "Lee", "555-0100"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created, json!({ "message": "Success", "customerId": 1 }));

        let (status, fetched) = send(&app, "GET", "/api/customers/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            fetched,
            json!({ "id": 1, "firstName": "Ann", "lastName": "Lee", "phoneNumber": "555-0100" })
        );

        pool.close().await;
    }

    #[tokio::test]
    async fn missing_or_empty_fields_are_rejected_before_the_store() {
        let (app, pool) = app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/customers",
            Some(json!({ "firstName": "Ann", "lastName": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields" }));

        let (status, body) = send(&app, "POST", "/api/customers", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, listing) = send(&app, "GET", "/api/customers", None).await;
        assert_eq!(listing["pagination"]["totalRecords"], 0);

        pool.close().await;
    }

    #[tokio::test]
    async fn duplicate_phone_number_conflicts_and_keeps_first_customer() {
        let (app, pool) = app().await;

        send(&app, "POST", "/api/customers", Some(customer("Ann", "Lee", "555-0100"))).await;
        let (status, body) =
            send(&app, "POST", "/api/customers", Some(customer("Bob", "Ray", "555-0100"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "A customer with this phone number already exists" }));

        let (status, fetched) = send(&app, "GET", "/api/customers/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["firstName"], "Ann");

        pool.close().await;
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let (app, pool) = app().await;

        let (status, body) = send(&app, "GET", "/api/customers/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Customer not found" }));

        let (status, body) = send(
            &app,
            "PUT",
            "/api/customers/999",
            Some(customer("Ann", "Lee", "555-0100")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Customer not found" }));

        let (status, body) = send(&app, "DELETE", "/api/customers/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Customer not found" }));

        pool.close().await;
    }

    #[tokio::test]
    async fn update_onto_taken_phone_number_conflicts() {
        let (app, pool) = app().await;
        send(&app, "POST", "/api/customers", Some(customer("Ann", "Lee", "555-0100"))).await;
        send(&app, "POST", "/api/customers", Some(customer("Bob", "Ray", "555-0101"))).await;

        let (status, body) =
            send(&app, "PUT", "/api/customers/2", Some(customer("Bob", "Ray", "555-0100"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "A customer with this phone number already exists" }));

        let (_, fetched) = send(&app, "GET", "/api/customers/2", None).await;
        assert_eq!(fetched["phoneNumber"], "555-0101");

        pool.close().await;
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_bad_request() {
        let (app, pool) = app().await;

        let (status, body) = send(&app, "GET", "/api/customers/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        pool.close().await;
    }

    #[tokio::test]
    async fn update_replaces_fields_and_echoes_payload() {
        let (app, pool) = app().await;
        send(&app, "POST", "/api/customers", Some(customer("Ann", "Lee", "555-0100"))).await;

        let (status, body) =
            send(&app, "PUT", "/api/customers/1", Some(customer("Anna", "Li", "555-0199"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "message": "success",
                "data": { "firstName": "Anna", "lastName": "Li", "phoneNumber": "555-0199" },
                "changes": 1
            })
        );

        let (status, body) =
            send(&app, "PUT", "/api/customers/1", Some(json!({ "firstName": "Anna" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");

        let (_, fetched) = send(&app, "GET", "/api/customers/1", None).await;
        assert_eq!(fetched["lastName"], "Li");

        pool.close().await;
    }

    #[tokio::test]
    async fn listing_paginates_with_consistent_totals() {
        let (app, pool) = app().await;
        for index in 0..12 {
            let first = format!("Customer{index:02}");
            let phone = format!("555-01{index:02}");
            send(&app, "POST", "/api/customers", Some(customer(&first, "Test", &phone))).await;
        }

        let (status, page) = send(&app, "GET", "/api/customers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().map(Vec::len), Some(5));
        assert_eq!(page["data"][0]["firstName"], "Customer00");
        assert_eq!(
            page["pagination"],
            json!({ "currentPage": 1, "totalPages": 3, "totalRecords": 12 })
        );

        let (_, last) = send(&app, "GET", "/api/customers?page=3&limit=5", None).await;
        assert_eq!(last["data"].as_array().map(Vec::len), Some(2));

        let (status, beyond) = send(&app, "GET", "/api/customers?page=7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(beyond["data"], json!([]));
        assert_eq!(
            beyond["pagination"],
            json!({ "currentPage": 7, "totalPages": 3, "totalRecords": 12 })
        );

        let (_, coerced) = send(&app, "GET", "/api/customers?page=abc&limit=zero", None).await;
        assert_eq!(coerced["pagination"]["currentPage"], 1);
        assert_eq!(coerced["data"].as_array().map(Vec::len), Some(5));

        let (status, repeated) =
            send(&app, "GET", "/api/customers?page=1&page=2&limit=5&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(repeated["pagination"]["currentPage"], 1);
        assert_eq!(repeated["data"].as_array().map(Vec::len), Some(5));

        pool.close().await;
    }

    #[tokio::test]
    async fn city_filter_returns_each_matching_customer_once() {
        let (app, pool) = app().await;
        send(&app, "POST", "/api/customers", Some(customer("Ann", "Lee", "555-0100"))).await;
        send(&app, "POST", "/api/customers", Some(customer("Bob", "Ray", "555-0101"))).await;

        for city in ["Springfield", "Springdale"] {
            send(
                &app,
                "POST",
                "/api/customers/1/addresses",
                Some(json!({
                    "addressLine1": "1 Main St",
                    "city": city,
                    "state": "IL",
                    "pincode": "62704"
                })),
            )
            .await;
        }
        send(
            &app,
            "POST",
            "/api/customers/2/addresses",
            Some(json!({
                "addressLine1": "9 Lake Dr",
                "city": "Chicago",
                "state": "IL",
                "pincode": "60601"
            })),
        )
        .await;

        let (status, page) = send(&app, "GET", "/api/customers?city=Spring", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(page["data"][0]["firstName"], "Ann");
        assert_eq!(page["pagination"]["totalRecords"], 1);

        let (_, page) = send(&app, "GET", "/api/customers?state=IL&pincode=606", None).await;
        assert_eq!(page["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(page["data"][0]["firstName"], "Bob");

        let (status, page) =
            send(&app, "GET", "/api/customers?city=Spring&city=Chicago", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(page["data"][0]["firstName"], "Ann", "first value of a repeated key wins");

        let (_, page) = send(&app, "GET", "/api/customers?city=&state=", None).await;
        assert_eq!(page["pagination"]["totalRecords"], 2, "empty filters are ignored");

        pool.close().await;
    }

    #[tokio::test]
    async fn store_failure_is_a_server_error() {
        let (app, pool) = app().await;
        pool.close().await;

        let (status, body) = send(&app, "GET", "/api/customers", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "an internal storage error occurred" }));
    }
}
