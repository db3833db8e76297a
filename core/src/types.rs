//! Wire types shared by several endpoint groups.
//!
//! # Design
//! Field names follow the API's PascalCase JSON; identifier fields keep the
//! API's `ID` suffix via explicit renames. Listing endpoints that page their
//! results all use the same `Page` envelope.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::QueryParams;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    pub results: Vec<T>,
    pub results_ordered_by: String,
    pub order_direction: String,
    pub page_number: u32,
    pub page_size: u32,
    pub records_on_this_page: u32,
    pub total_number_of_records: u32,
    pub number_of_pages: u32,
}

impl<T> Page<T> {
    /// Whether a later page exists. Callers fetch it themselves by bumping
    /// `PageOptions::page`.
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.number_of_pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging and ordering parameters accepted by listing endpoints. Unset
/// fields are left to the server's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub order_field: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

impl PageOptions {
    pub(crate) fn apply(&self, query: &mut QueryParams) {
        query
            .set_opt("page", self.page.filter(|p| *p > 0))
            .set_opt("pagesize", self.page_size.filter(|p| *p > 0))
            .set_opt("orderfield", self.order_field.as_deref().filter(|f| !f.is_empty()))
            .set_opt("orderdirection", self.order_direction);
    }
}

/// A subscriber's value for one custom field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomField {
    pub key: String,
    pub value: serde_json::Value,
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Serde adapter for the API's `YYYY-MM-DD HH:MM:SS` timestamps. Missing,
/// null and empty values map to `None`.
pub(crate) mod api_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&value.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDateTime::parse_from_str(raw, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
