use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::escape;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::api_datetime;

/// A client of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A subscriber list belonging to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    #[serde(rename = "ListID")]
    pub list_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A list an email address is subscribed to, with its state on that list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListForEmail {
    #[serde(rename = "ListID")]
    pub list_id: String,
    pub list_name: String,
    #[serde(default)]
    pub subscriber_state: String,
    #[serde(default, with = "api_datetime", skip_serializing_if = "Option::is_none")]
    pub date_subscriber_added: Option<NaiveDateTime>,
}

impl<T: Transport> ApiClient<T> {
    /// Lists the clients of the authenticated account.
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let req = self.request(HttpMethod::Get, "clients.json")?;
        self.execute(req)
    }

    /// Lists the subscriber lists of a client.
    pub fn list_lists(&self, client_id: &str) -> Result<Vec<List>> {
        let path = format!("clients/{}/lists.json", escape(client_id));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }

    /// Lists every list of `client_id` that `email` appears on.
    pub fn lists_for_email(&self, client_id: &str, email: &str) -> Result<Vec<ListForEmail>> {
        let path = QueryParams::new()
            .set("email", email)
            .append_to(&format!("clients/{}/listsforemail.json", escape(client_id)));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }
}
