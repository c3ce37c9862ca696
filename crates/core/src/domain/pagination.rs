//! Page windowing and listing filters for the customer directory.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Coerces raw query-string values. Missing, non-numeric, and zero values fall
    /// back to the defaults.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_positive(page, DEFAULT_PAGE), parse_positive(limit, DEFAULT_LIMIT))
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_records: u64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_records: u64) -> Self {
        let limit = u64::from(request.limit);
        Self {
            current_page: request.page,
            total_pages: total_records.div_ceil(limit),
            total_records,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

/// Address substring filters narrowing the customer listing. Empty values are
/// treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl CustomerFilter {
    pub fn new(city: Option<String>, state: Option<String>, pincode: Option<String>) -> Self {
        Self { city: non_empty(city), state: non_empty(state), pincode: non_empty(pincode) }
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.state.is_none() && self.pincode.is_none()
    }

    /// Present filters as `(column, needle)` pairs in a fixed order.
    pub fn terms(&self) -> Vec<(&'static str, &str)> {
        [("city", &self.city), ("state", &self.state), ("pincode", &self.pincode)]
            .into_iter()
            .filter_map(|(column, value)| value.as_deref().map(|needle| (column, needle)))
            .collect()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
