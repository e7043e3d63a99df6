//! Wire payload types for mutation endpoints.
//!
//! Every numeric identifier is an integer by the time a payload exists;
//! parsing from form input happens in the submission pipeline, never here.

use serde::Serialize;

/// One (template, count) pair of a rotation campaign.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RotationStepPayload {
    pub template_id: i64,
    pub count: i64,
}

/// Body of `POST /campaigns/start`. Exactly one of `template_id`,
/// `ab_test_id`, or `rotation_steps` is present, selected by the draft's
/// mode; the inactive ones are omitted entirely. `scheduled_for` is always
/// serialized, with `null` meaning "start immediately".
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CampaignStartRequest {
    pub name: String,
    pub list_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ab_test_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_steps: Option<Vec<RotationStepPayload>>,
    pub account_ids: Vec<i64>,
    pub delay: f64,
    pub scheduled_for: Option<String>,
}

/// One weighted variant of an A/B test.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AbTestVariantPayload {
    pub template_id: i64,
    pub weight: i64,
}

/// Body of `POST /ab_test/create`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AbTestCreateRequest {
    pub name: String,
    pub variants: Vec<AbTestVariantPayload>,
}

/// One step of a drip sequence. `step_order` is 1-based and contiguous.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DripStepPayload {
    pub template_id: i64,
    pub delay_minutes: i64,
    pub step_order: i64,
}

/// Body of `POST /drip/`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DripCreateRequest {
    pub name: String,
    pub list_id: i64,
    pub account_id: i64,
    pub steps: Vec<DripStepPayload>,
}

/// Body of `POST /messages/`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateCreateRequest {
    pub name: String,
    pub content: String,
}

/// Body of `POST /inbox/reply`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplyRequest {
    pub account_id: i64,
    pub peer_id: i64,
    pub message: String,
}

/// Body of `POST /delay/`.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DelaySettingsRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
    pub min_delay: f64,
    pub max_delay: f64,
}

/// Body of `POST /filters/`.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterSettingsRequest {
    pub skip_no_photo: bool,
    pub skip_bots: bool,
}
