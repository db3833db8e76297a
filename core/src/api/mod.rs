//! Endpoint methods, one module per API resource.
//!
//! Each method builds its relative path (including any query string), picks
//! the decode target and hands off to `ApiClient::execute` or
//! `ApiClient::execute_empty`.

pub mod campaigns;
pub mod clients;
pub mod lists;
pub mod segments;
pub mod subscribers;
pub mod webhooks;

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes an identifier for use as one path segment, so `/`, `?`
/// and `#` cannot change the resolved URL. `ApiClient::new_request` rejects
/// the `.` and `..` segments that encoding cannot neutralise.
pub(crate) fn escape(segment: &str) -> PercentEncode<'_> {
    utf8_percent_encode(segment, PATH_SEGMENT)
}

/// Unwraps the bare JSON string some create endpoints return as the new
/// resource's identifier.
pub(crate) fn expect_string(value: Value) -> Result<String> {
    match value {
        Value::String(id) => Ok(id),
        other => Err(ApiError::UnexpectedResponse(format!(
            "expected a JSON string, got {other}"
        ))),
    }
}
