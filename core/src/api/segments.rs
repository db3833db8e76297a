use serde::{Deserialize, Serialize};

use super::escape;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    pub rule_type: String,
    pub clause: String,
}

/// Rules within a group are ANDed; groups are ORed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleGroup {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentCreate {
    pub title: String,
    pub rule_groups: Vec<RuleGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentDetail {
    #[serde(default)]
    pub active_subscribers: u64,
    #[serde(default)]
    pub rule_groups: Vec<RuleGroup>,
    #[serde(rename = "ListID")]
    pub list_id: String,
    #[serde(rename = "SegmentID")]
    pub segment_id: String,
    pub title: String,
}

impl<T: Transport> ApiClient<T> {
    /// Creates a segment on `list_id` and returns its ID.
    pub fn create_segment(&self, list_id: &str, segment: &SegmentCreate) -> Result<String> {
        let path = format!("segments/{}.json", escape(list_id));
        let req = self.new_request(HttpMethod::Post, &path, Some(segment))?;
        self.execute(req)
    }

    pub fn segment_details(&self, segment_id: &str) -> Result<SegmentDetail> {
        let req = self.request(HttpMethod::Get, &format!("segments/{}.json", escape(segment_id)))?;
        self.execute(req)
    }
}
