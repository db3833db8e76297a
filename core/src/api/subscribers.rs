use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::escape;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::{api_datetime, is_false, CustomField};

/// Payload for adding or updating a subscriber.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewSubscriber {
    pub email_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    #[serde(skip_serializing_if = "is_false")]
    pub resubscribe: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub restart_subscription_based_autoresponders: bool,
}

impl NewSubscriber {
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            ..Self::default()
        }
    }
}

/// A subscriber as returned by detail and listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscriber {
    pub email_address: String,
    #[serde(default)]
    pub name: String,
    /// When the subscriber joined or last changed state.
    #[serde(default, with = "api_datetime", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
    #[serde(default)]
    pub reads_email_with: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSubscriber {
    pub email_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSubscribers {
    pub subscribers: Vec<ImportSubscriber>,
    #[serde(skip_serializing_if = "is_false")]
    pub resubscribe: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub queue_subscription_based_auto_responders: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub restart_subscription_based_autoresponders: bool,
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    #[serde(rename = "EmailAddress")]
    email_address: &'a str,
}

fn subscriber_path(list_id: &str, email: &str) -> String {
    QueryParams::new()
        .set("email", email)
        .append_to(&format!("subscribers/{}.json", escape(list_id)))
}

impl<T: Transport> ApiClient<T> {
    pub fn add_subscriber(&self, list_id: &str, subscriber: &NewSubscriber) -> Result<()> {
        let path = format!("subscribers/{}.json", escape(list_id));
        let req = self.new_request(HttpMethod::Post, &path, Some(subscriber))?;
        self.execute_empty(req)
    }

    /// Updates the subscriber currently known as `email`; the payload may
    /// change the address.
    pub fn update_subscriber(&self, list_id: &str, email: &str, subscriber: &NewSubscriber) -> Result<()> {
        let req = self.new_request(HttpMethod::Put, &subscriber_path(list_id, email), Some(subscriber))?;
        self.execute_empty(req)
    }

    pub fn get_subscriber(&self, list_id: &str, email: &str) -> Result<Subscriber> {
        let req = self.request(HttpMethod::Get, &subscriber_path(list_id, email))?;
        self.execute(req)
    }

    /// Moves a subscriber from active to unsubscribed.
    pub fn unsubscribe(&self, list_id: &str, email: &str) -> Result<()> {
        let body = EmailAddress { email_address: email };
        let req = self.new_request(
            HttpMethod::Post,
            &format!("subscribers/{}/unsubscribe.json", escape(list_id)),
            Some(&body),
        )?;
        self.execute_empty(req)
    }

    pub fn delete_subscriber(&self, list_id: &str, email: &str) -> Result<()> {
        let req = self.request(HttpMethod::Delete, &subscriber_path(list_id, email))?;
        self.execute_empty(req)
    }

    /// Imports many subscribers at once. The result summary's shape varies,
    /// so it is returned undecoded.
    pub fn import_subscribers(&self, list_id: &str, import: &ImportSubscribers) -> Result<Value> {
        let path = format!("subscribers/{}/import.json", escape(list_id));
        let req = self.new_request(HttpMethod::Post, &path, Some(import))?;
        self.execute(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscriber_omits_unset_fields() {
        let json = serde_json::to_string(&NewSubscriber::new("alice@example.com")).unwrap();
        assert_eq!(json, r#"{"EmailAddress":"alice@example.com"}"#);
    }

    #[test]
    fn new_subscriber_renders_flags_and_custom_fields() {
        let sub = NewSubscriber {
            email_address: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            custom_fields: vec![CustomField {
                key: "website".to_string(),
                value: Value::from("https://example.com"),
            }],
            resubscribe: true,
            restart_subscription_based_autoresponders: false,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["Name"], "Alice");
        assert_eq!(json["Resubscribe"], true);
        assert_eq!(json["CustomFields"][0]["Key"], "website");
        assert!(json.get("RestartSubscriptionBasedAutoresponders").is_none());
    }

    #[test]
    fn subscriber_path_encodes_email() {
        assert_eq!(
            subscriber_path("12CD", "alice@example.com"),
            "subscribers/12CD.json?email=alice%40example.com"
        );
    }

    #[test]
    fn import_uses_api_flag_names() {
        let import = ImportSubscribers {
            subscribers: vec![ImportSubscriber {
                email_address: "bob@example.com".to_string(),
                name: String::new(),
                custom_fields: Vec::new(),
            }],
            queue_subscription_based_auto_responders: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&import).unwrap();
        assert_eq!(json["QueueSubscriptionBasedAutoResponders"], true);
        assert_eq!(json["Subscribers"][0]["EmailAddress"], "bob@example.com");
        assert!(json.get("Resubscribe").is_none());
    }
}
