use serde::{Deserialize, Serialize};

use super::escape;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::{Page, PageOptions};

/// An address a campaign was sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "EmailAddress")]
    pub email_address: String,
    #[serde(rename = "ListID")]
    pub list_id: String,
}

impl<T: Transport> ApiClient<T> {
    /// Fetches one page of a campaign's recipients.
    pub fn campaign_recipients(
        &self,
        campaign_id: &str,
        options: Option<&PageOptions>,
    ) -> Result<Page<Recipient>> {
        let mut query = QueryParams::new();
        if let Some(options) = options {
            options.apply(&mut query);
        }
        let path = query.append_to(&format!("campaigns/{}/recipients.json", escape(campaign_id)));
        let req = self.request(HttpMethod::Get, &path)?;
        self.execute(req)
    }
}
