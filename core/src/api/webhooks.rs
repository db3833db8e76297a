use serde::{Deserialize, Serialize};

use super::escape;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;

/// Webhook registration. `events` takes values such as `Subscribe`,
/// `Deactivate` and `Update`; `payload_format` is `json` or `xml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhookCreate {
    pub events: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub payload_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(flatten)]
    pub config: WebhookCreate,
    #[serde(rename = "WebhookID")]
    pub webhook_id: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn list_webhooks(&self, list_id: &str) -> Result<Vec<Webhook>> {
        let path = format!("lists/{}/webhooks.json", escape(list_id));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }

    /// Registers a webhook and returns its ID.
    pub fn create_webhook(&self, list_id: &str, webhook: &WebhookCreate) -> Result<String> {
        let path = format!("lists/{}/webhooks.json", escape(list_id));
        let req = self.new_request(HttpMethod::Post, &path, Some(webhook))?;
        self.execute(req)
    }

    /// Asks the API to deliver a test payload. A failed delivery comes back
    /// as `ApiError::Api` with the delivery report in `result_data`.
    pub fn test_webhook(&self, list_id: &str, webhook_id: &str) -> Result<()> {
        let path = format!("lists/{}/webhooks/{}/test.json", escape(list_id), escape(webhook_id));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute_empty(req)
    }

    pub fn delete_webhook(&self, list_id: &str, webhook_id: &str) -> Result<()> {
        let path = format!("lists/{}/webhooks/{}.json", escape(list_id), escape(webhook_id));
        let req = self.request(HttpMethod::Delete, &path)?;
        self.execute_empty(req)
    }

    pub fn activate_webhook(&self, list_id: &str, webhook_id: &str) -> Result<()> {
        let path = format!(
            "lists/{}/webhooks/{}/activate.json",
            escape(list_id),
            escape(webhook_id)
        );
        let req = self.request(HttpMethod::Put, &path)?;
        self.execute_empty(req)
    }

    pub fn deactivate_webhook(&self, list_id: &str, webhook_id: &str) -> Result<()> {
        let path = format!(
            "lists/{}/webhooks/{}/deactivate.json",
            escape(list_id),
            escape(webhook_id)
        );
        let req = self.request(HttpMethod::Put, &path)?;
        self.execute_empty(req)
    }
}
