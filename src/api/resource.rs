//! Response schemas for every consumed backend endpoint.
//!
//! Each type is shape-checked at the API boundary so a malformed server
//! response fails fast instead of propagating missing fields into views.

use fake::Dummy;
use serde::Deserialize;

/// Defines sender account data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: i64,
    pub phone_number: String,
    pub is_active: bool,
    #[serde(default)]
    pub health_status: Option<String>,
}

/// Result of a liveness probe against a sender account.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub last_check: Option<String>,
}

/// Defines contact list data structure.
///
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContactList {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
}

impl ContactList {
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// Defines message template data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct MessageTemplate {
    pub id: i64,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
}

/// Defines campaign data structure. The scheduler view reuses this shape,
/// since scheduled jobs are campaigns with status `scheduled`.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Defines A/B test variant data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct AbTestVariant {
    pub template_id: i64,
    pub weight: i64,
    #[serde(default)]
    pub sent_count: i64,
    #[serde(default)]
    pub reply_count: i64,
}

/// Defines A/B test data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct AbTest {
    pub id: i64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub variants: Vec<AbTestVariant>,
}

/// Defines drip sequence step data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct DripStep {
    pub template_id: i64,
    pub delay_minutes: i64,
    pub step_order: i64,
}

/// Defines drip campaign data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct DripCampaign {
    pub id: i64,
    pub name: String,
    pub list_id: i64,
    pub account_id: i64,
    pub status: String,
    #[serde(default)]
    pub steps: Vec<DripStep>,
}

/// Defines inbox dialog data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct InboxDialog {
    pub id: i64,
    pub name: String,
    pub unread_count: i64,
    #[serde(default)]
    pub last_message: Option<String>,
}

/// Defines inbox message data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct InboxMessage {
    pub id: i64,
    pub sender_id: i64,
    pub text: String,
    pub date: String,
    pub is_outgoing: bool,
}

/// Defines message send-delay settings.
///
#[derive(Clone, Debug, Dummy, PartialEq, Deserialize)]
pub struct DelaySettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub min_delay: f64,
    pub max_delay: f64,
}

/// Defines recipient filter settings.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct FilterSettings {
    pub skip_no_photo: bool,
    pub skip_bots: bool,
}

/// Minimal acknowledgement body returned by mutation endpoints.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub campaign_id: Option<i64>,
    #[serde(default)]
    pub id: Option<i64>,
}
