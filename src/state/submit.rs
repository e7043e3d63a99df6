//! Draft validation and wire payload construction.
//!
//! Mode-specific checks run before any network call; a draft that fails
//! validation never produces a request. Builders parse the string-typed form
//! selections into integer identifiers and convert the optional local
//! schedule input into an ISO-8601 UTC instant.

use super::draft::{AbTestDraft, CampaignDraft, CampaignMode, DripDraft};
use crate::api::{
    AbTestCreateRequest, AbTestVariantPayload, CampaignStartRequest, DripCreateRequest,
    DripStepPayload, RotationStepPayload,
};
use chrono::{Local, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::collections::HashSet;

/// Phase of the submission state machine. Validation failures never leave
/// `Idle`; a submission returns to `Idle` on both outcomes.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Dismissible banner raised by a finished submission.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// A draft defect caught client-side, before any request is sent.
///
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a list and at least one account.")]
    MissingListOrAccounts,

    #[error("Please select a message template.")]
    MissingTemplate,

    #[error("Please select an A/B test.")]
    MissingAbTest,

    #[error("Please ensure all rotation steps have a template and count >= 1.")]
    IncompleteRotationSteps,

    #[error("Please select at least 2 templates for rotation.")]
    TooFewRotationTemplates,

    #[error("An A/B test needs at least 2 variants, each with a template.")]
    IncompleteVariants,

    #[error("Please select a list and a sender account.")]
    MissingDripListOrAccount,

    #[error("A drip sequence needs at least one step, each with a template.")]
    IncompleteDripSteps,

    #[error("The scheduled time is not a valid date.")]
    InvalidSchedule,
}

/// Validate a campaign draft and build the `POST /campaigns/start` payload.
///
pub fn build_campaign_request(
    draft: &CampaignDraft,
) -> Result<CampaignStartRequest, ValidationError> {
    let list_id = parse_id(&draft.list_id).ok_or(ValidationError::MissingListOrAccounts)?;
    if draft.account_ids.is_empty() {
        return Err(ValidationError::MissingListOrAccounts);
    }

    let mut request = CampaignStartRequest {
        name: draft.name.clone(),
        list_id,
        template_id: None,
        ab_test_id: None,
        rotation_steps: None,
        account_ids: draft.account_ids.clone(),
        delay: draft.delay.value(),
        scheduled_for: schedule_to_utc(&draft.scheduled_for)?,
    };

    match draft.mode {
        CampaignMode::Template => {
            request.template_id =
                Some(parse_id(&draft.template_id).ok_or(ValidationError::MissingTemplate)?);
        }
        CampaignMode::AbTest => {
            request.ab_test_id =
                Some(parse_id(&draft.ab_test_id).ok_or(ValidationError::MissingAbTest)?);
        }
        CampaignMode::Rotation => {
            let mut steps = Vec::with_capacity(draft.rotation_steps.len());
            for step in draft.rotation_steps.iter() {
                let template_id =
                    parse_id(&step.template_id).ok_or(ValidationError::IncompleteRotationSteps)?;
                if step.count.value() < 1 {
                    return Err(ValidationError::IncompleteRotationSteps);
                }
                steps.push(RotationStepPayload {
                    template_id,
                    count: step.count.value(),
                });
            }
            request.rotation_steps = Some(steps);
        }
        CampaignMode::AutoRotation => {
            let distinct: HashSet<&String> = draft.auto_rotation.template_ids.iter().collect();
            if distinct.len() < 2 {
                return Err(ValidationError::TooFewRotationTemplates);
            }
            // Auto-rotation is expressed on the wire as plain rotation steps
            // sharing the rotate-every count.
            let count = draft.auto_rotation.rotate_every.value().max(1);
            let mut steps = Vec::with_capacity(draft.auto_rotation.template_ids.len());
            for raw in &draft.auto_rotation.template_ids {
                let template_id =
                    parse_id(raw).ok_or(ValidationError::TooFewRotationTemplates)?;
                steps.push(RotationStepPayload { template_id, count });
            }
            request.rotation_steps = Some(steps);
        }
    }

    Ok(request)
}

/// Validate an A/B test draft and build the `POST /ab_test/create` payload.
/// Weights are treated as relative values; their sum is not checked.
///
pub fn build_ab_test_request(draft: &AbTestDraft) -> Result<AbTestCreateRequest, ValidationError> {
    if draft.variants.len() < 2 {
        return Err(ValidationError::IncompleteVariants);
    }
    let mut variants = Vec::with_capacity(draft.variants.len());
    for variant in draft.variants.iter() {
        let template_id =
            parse_id(&variant.template_id).ok_or(ValidationError::IncompleteVariants)?;
        variants.push(AbTestVariantPayload {
            template_id,
            weight: variant.weight.value(),
        });
    }
    Ok(AbTestCreateRequest {
        name: draft.name.clone(),
        variants,
    })
}

/// Validate a drip draft and build the `POST /drip/` payload.
///
pub fn build_drip_request(draft: &DripDraft) -> Result<DripCreateRequest, ValidationError> {
    let list_id = parse_id(&draft.list_id).ok_or(ValidationError::MissingDripListOrAccount)?;
    let account_id =
        parse_id(&draft.account_id).ok_or(ValidationError::MissingDripListOrAccount)?;
    if draft.steps.is_empty() {
        return Err(ValidationError::IncompleteDripSteps);
    }
    let mut steps = Vec::with_capacity(draft.steps.len());
    for step in draft.steps.iter() {
        let template_id =
            parse_id(&step.template_id).ok_or(ValidationError::IncompleteDripSteps)?;
        steps.push(DripStepPayload {
            template_id,
            delay_minutes: step.delay_minutes.value(),
            step_order: step.step_order,
        });
    }
    Ok(DripCreateRequest {
        name: draft.name.clone(),
        list_id,
        account_id,
        steps,
    })
}

/// Convert the `datetime-local` form input to an ISO-8601 UTC instant.
/// An empty input means "start immediately" and maps to `None`.
///
fn schedule_to_utc(raw: &str) -> Result<Option<String>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidSchedule)?;
    let local = match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => return Err(ValidationError::InvalidSchedule),
    };
    Ok(Some(
        local
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

/// Parse a select-input value into an identifier. Empty strings mean
/// "nothing selected".
///
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
