use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{escape, expect_string};
use super::subscribers::Subscriber;
use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::{format_date, Page, PageOptions};

/// Subscriber state used to select a list's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberGroup {
    Active,
    Unconfirmed,
    Unsubscribed,
    Bounced,
    Deleted,
}

impl SubscriberGroup {
    pub const ALL: [SubscriberGroup; 5] = [
        SubscriberGroup::Active,
        SubscriberGroup::Unconfirmed,
        SubscriberGroup::Unsubscribed,
        SubscriberGroup::Bounced,
        SubscriberGroup::Deleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriberGroup::Active => "active",
            SubscriberGroup::Unconfirmed => "unconfirmed",
            SubscriberGroup::Unsubscribed => "unsubscribed",
            SubscriberGroup::Bounced => "bounced",
            SubscriberGroup::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SubscriberGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriberGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SubscriberGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown subscriber group {s:?} (expected active, unconfirmed, unsubscribed, bounced or deleted)")
            })
    }
}

/// Filters for `list_subscribers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSubscribersOptions {
    /// Only subscribers added or changed on or after this date.
    pub date: Option<NaiveDate>,
    pub page: PageOptions,
}

/// Whether unsubscribing from the list also unsubscribes from the client's
/// other lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsubscribeSetting {
    AllClientLists,
    OnlyThisList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListCreateOptions {
    pub title: String,
    pub unsubscribe_page: String,
    /// Required; `create_list` refuses to send without it.
    pub unsubscribe_setting: Option<UnsubscribeSetting>,
    pub confirmed_optin: bool,
    pub confirmation_success_page: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Number,
    MultiSelectOne,
    MultiSelectMany,
    Date,
    Country,
    #[serde(rename = "USState")]
    UsState,
}

/// A custom field defined on a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomFieldDefinition {
    pub field_name: String,
    /// Bracketed key, e.g. `[website]`.
    pub key: String,
    pub data_type: DataType,
    #[serde(default)]
    pub field_options: Vec<String>,
    #[serde(default)]
    pub visible_in_preference_center: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomFieldCreate {
    pub field_name: String,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub visible_in_preference_center: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSegment {
    #[serde(rename = "ListID")]
    pub list_id: String,
    #[serde(rename = "SegmentID")]
    pub segment_id: String,
    #[serde(rename = "Title")]
    pub title: String,
}

impl<T: Transport> ApiClient<T> {
    /// Fetches one page of the subscribers of `list_id` in `group`.
    pub fn list_subscribers(
        &self,
        list_id: &str,
        group: SubscriberGroup,
        options: Option<&ListSubscribersOptions>,
    ) -> Result<Page<Subscriber>> {
        let mut query = QueryParams::new();
        if let Some(options) = options {
            query.set_opt("date", options.date.map(format_date));
            options.page.apply(&mut query);
        }
        let path = query.append_to(&format!("lists/{}/{group}.json", escape(list_id)));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }

    /// Creates a list for `client_id` and returns the new list ID.
    pub fn create_list(&self, client_id: &str, options: &ListCreateOptions) -> Result<String> {
        if options.unsubscribe_setting.is_none() {
            return Err(ApiError::InvalidOptions("UnsubscribeSetting not set"));
        }
        let path = format!("lists/{}.json", escape(client_id));
        let req = self.new_request(HttpMethod::Post, &path, Some(options))?;
        let id: Value = self.execute(req)?;
        expect_string(id)
    }

    pub fn delete_list(&self, list_id: &str) -> Result<()> {
        let req = self.request(HttpMethod::Delete, &format!("lists/{}.json", escape(list_id)))?;
        self.execute_empty(req)
    }

    pub fn list_custom_fields(&self, list_id: &str) -> Result<Vec<CustomFieldDefinition>> {
        let path = format!("lists/{}/customfields.json", escape(list_id));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }

    /// Creates a custom field and returns its key.
    pub fn create_custom_field(&self, list_id: &str, field: &CustomFieldCreate) -> Result<String> {
        let req = self.new_request(
            HttpMethod::Post,
            &format!("lists/{}/customfields.json", escape(list_id)),
            Some(field),
        )?;
        let key: Value = self.execute(req)?;
        expect_string(key)
    }

    pub fn delete_custom_field(&self, list_id: &str, key: &str) -> Result<()> {
        let path = format!("lists/{}/customfields/{}.json", escape(list_id), escape(key));
        let req = self.request(HttpMethod::Delete, &path)?;
        self.execute_empty(req)
    }

    pub fn list_segments(&self, list_id: &str) -> Result<Vec<ListSegment>> {
        let path = format!("lists/{}/segments.json", escape(list_id));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }
}
