//! In-progress entity definitions for the creation forms.
//!
//! Each draft is an explicit, serializable state object updated only through
//! pure reducer-style transitions: `apply` takes the previous draft by value
//! and returns the next one, so a stale captured snapshot can never clobber
//! a later edit. Drafts live in memory only; resetting restores the same
//! shape the form opens with.

use super::steps::StepList;
use serde::{Deserialize, Serialize};

/// Numeric form input keeping the raw text and the last committed value
/// separately. A commit only happens on a successful parse of a value the
/// field accepts; otherwise the raw text updates but the previous value is
/// kept, never silently replaced by 0 or NaN.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntField {
    raw: String,
    value: i64,
}

impl IntField {
    pub fn new(value: i64) -> Self {
        IntField {
            raw: value.to_string(),
            value,
        }
    }

    /// Record the raw text, committing the parsed value only when it is a
    /// finite non-negative integer within `max`.
    ///
    pub fn set(&mut self, raw: &str, max: i64) {
        self.raw = raw.to_string();
        if let Ok(parsed) = raw.trim().parse::<i64>() {
            if (0..=max).contains(&parsed) {
                self.value = parsed;
            }
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Floating-point counterpart of [`IntField`], used for the inter-message
/// delay. Commits only positive finite values.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatField {
    raw: String,
    value: f64,
}

impl FloatField {
    pub fn new(value: f64) -> Self {
        FloatField {
            raw: value.to_string(),
            value,
        }
    }

    pub fn set(&mut self, raw: &str) {
        self.raw = raw.to_string();
        if let Ok(parsed) = raw.trim().parse::<f64>() {
            if parsed.is_finite() && parsed > 0.0 {
                self.value = parsed;
            }
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Which message source a campaign draft uses. Exactly one of the draft's
/// `template_id` / `ab_test_id` / `rotation_steps` / `auto_rotation` is
/// semantically active, selected here.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignMode {
    Template,
    AbTest,
    Rotation,
    AutoRotation,
}

/// One editable (template, count) rotation step.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationStepDraft {
    pub template_id: String,
    pub count: IntField,
}

impl Default for RotationStepDraft {
    fn default() -> Self {
        RotationStepDraft {
            template_id: String::new(),
            count: IntField::new(1),
        }
    }
}

/// Auto-rotation settings: a template pool and a rotate-every count.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoRotationDraft {
    pub template_ids: Vec<String>,
    pub rotate_every: IntField,
}

impl Default for AutoRotationDraft {
    fn default() -> Self {
        AutoRotationDraft {
            template_ids: vec![],
            rotate_every: IntField::new(5),
        }
    }
}

/// Draft of a campaign being composed before submission.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub list_id: String,
    pub mode: CampaignMode,
    pub template_id: String,
    pub ab_test_id: String,
    pub rotation_steps: StepList<RotationStepDraft>,
    pub auto_rotation: AutoRotationDraft,
    pub account_ids: Vec<i64>,
    pub delay: FloatField,
    /// Local `YYYY-MM-DDTHH:MM` input; empty means start immediately.
    pub scheduled_for: String,
}

impl Default for CampaignDraft {
    fn default() -> Self {
        CampaignDraft {
            name: String::new(),
            list_id: String::new(),
            mode: CampaignMode::Template,
            template_id: String::new(),
            ab_test_id: String::new(),
            rotation_steps: StepList::new(vec![RotationStepDraft::default()], 1),
            auto_rotation: AutoRotationDraft::default(),
            account_ids: vec![],
            delay: FloatField::new(1.0),
            scheduled_for: String::new(),
        }
    }
}

/// A transition of the campaign form.
///
#[derive(Clone, Debug)]
pub enum CampaignChange {
    Name(String),
    List(String),
    Mode(CampaignMode),
    Template(String),
    AbTest(String),
    AddRotationStep,
    RotationStepTemplate { index: usize, template_id: String },
    RotationStepCount { index: usize, raw: String },
    RemoveRotationStep(usize),
    ToggleAutoTemplate(String),
    RotateEvery(String),
    ToggleAccount(i64),
    SetAccounts(Vec<i64>),
    Delay(String),
    ScheduledFor(String),
    Reset,
}

impl CampaignDraft {
    /// Apply a transition, previous-state-in / next-state-out.
    ///
    pub fn apply(mut self, change: CampaignChange) -> Self {
        match change {
            CampaignChange::Name(name) => self.name = name,
            CampaignChange::List(id) => self.list_id = id,
            CampaignChange::Mode(mode) => self.mode = mode,
            CampaignChange::Template(id) => self.template_id = id,
            CampaignChange::AbTest(id) => self.ab_test_id = id,
            CampaignChange::AddRotationStep => {
                self.rotation_steps.push(RotationStepDraft::default())
            }
            CampaignChange::RotationStepTemplate { index, template_id } => {
                self.rotation_steps
                    .update(index, |step| step.template_id = template_id);
            }
            CampaignChange::RotationStepCount { index, raw } => {
                self.rotation_steps
                    .update(index, |step| step.count.set(&raw, i64::MAX));
            }
            CampaignChange::RemoveRotationStep(index) => {
                self.rotation_steps.remove(index);
            }
            CampaignChange::ToggleAutoTemplate(id) => {
                let ids = &mut self.auto_rotation.template_ids;
                match ids.iter().position(|t| *t == id) {
                    Some(pos) => {
                        ids.remove(pos);
                    }
                    None => ids.push(id),
                }
            }
            CampaignChange::RotateEvery(raw) => {
                self.auto_rotation.rotate_every.set(&raw, i64::MAX)
            }
            CampaignChange::ToggleAccount(id) => {
                match self.account_ids.iter().position(|a| *a == id) {
                    Some(pos) => {
                        self.account_ids.remove(pos);
                    }
                    None => self.account_ids.push(id),
                }
            }
            CampaignChange::SetAccounts(ids) => {
                self.account_ids.clear();
                for id in ids {
                    if !self.account_ids.contains(&id) {
                        self.account_ids.push(id);
                    }
                }
            }
            CampaignChange::Delay(raw) => self.delay.set(&raw),
            CampaignChange::ScheduledFor(raw) => self.scheduled_for = raw,
            CampaignChange::Reset => return CampaignDraft::default(),
        }
        self
    }
}

/// One editable weighted variant of an A/B test draft.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantDraft {
    pub template_id: String,
    pub weight: IntField,
}

impl VariantDraft {
    fn with_weight(weight: i64) -> Self {
        VariantDraft {
            template_id: String::new(),
            weight: IntField::new(weight),
        }
    }
}

/// Draft of an A/B test. Opens with two variants split 50/50; removal never
/// drops below two.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbTestDraft {
    pub name: String,
    pub variants: StepList<VariantDraft>,
}

impl Default for AbTestDraft {
    fn default() -> Self {
        AbTestDraft {
            name: String::new(),
            variants: StepList::new(
                vec![VariantDraft::with_weight(50), VariantDraft::with_weight(50)],
                2,
            ),
        }
    }
}

/// A transition of the A/B test form.
///
#[derive(Clone, Debug)]
pub enum AbTestChange {
    Name(String),
    AddVariant,
    VariantTemplate { index: usize, template_id: String },
    VariantWeight { index: usize, raw: String },
    RemoveVariant(usize),
    Reset,
}

impl AbTestDraft {
    pub fn apply(mut self, change: AbTestChange) -> Self {
        match change {
            AbTestChange::Name(name) => self.name = name,
            AbTestChange::AddVariant => self.variants.push(VariantDraft::with_weight(0)),
            AbTestChange::VariantTemplate { index, template_id } => {
                self.variants
                    .update(index, |v| v.template_id = template_id);
            }
            AbTestChange::VariantWeight { index, raw } => {
                // Weights are presented as percentages, so out-of-range
                // input is rejected like any other invalid number.
                self.variants.update(index, |v| v.weight.set(&raw, 100));
            }
            AbTestChange::RemoveVariant(index) => {
                self.variants.remove(index);
            }
            AbTestChange::Reset => return AbTestDraft::default(),
        }
        self
    }
}

/// One committed step of a drip sequence.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DripStepDraft {
    pub template_id: String,
    pub delay_minutes: IntField,
    pub step_order: i64,
}

/// Staging area for the next drip step before it is appended.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingDripStep {
    pub template_id: String,
    pub delay_minutes: IntField,
}

impl Default for PendingDripStep {
    fn default() -> Self {
        PendingDripStep {
            template_id: String::new(),
            delay_minutes: IntField::new(0),
        }
    }
}

/// Draft of a drip campaign.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DripDraft {
    pub name: String,
    pub list_id: String,
    pub account_id: String,
    pub steps: StepList<DripStepDraft>,
    pub pending: PendingDripStep,
}

impl Default for DripDraft {
    fn default() -> Self {
        DripDraft {
            name: String::new(),
            list_id: String::new(),
            account_id: String::new(),
            steps: StepList::new(vec![], 0),
            pending: PendingDripStep::default(),
        }
    }
}

/// A transition of the drip form.
///
#[derive(Clone, Debug)]
pub enum DripChange {
    Name(String),
    List(String),
    Account(String),
    PendingTemplate(String),
    PendingDelay(String),
    /// Append the pending step with the next 1-based `step_order` and clear
    /// the staging area.
    AppendStep,
    RemoveStep(usize),
    Reset,
}

impl DripDraft {
    pub fn apply(mut self, change: DripChange) -> Self {
        match change {
            DripChange::Name(name) => self.name = name,
            DripChange::List(id) => self.list_id = id,
            DripChange::Account(id) => self.account_id = id,
            DripChange::PendingTemplate(id) => self.pending.template_id = id,
            DripChange::PendingDelay(raw) => self.pending.delay_minutes.set(&raw, i64::MAX),
            DripChange::AppendStep => {
                let pending = std::mem::take(&mut self.pending);
                let step_order = self.steps.len() as i64 + 1;
                self.steps.push(DripStepDraft {
                    template_id: pending.template_id,
                    delay_minutes: pending.delay_minutes,
                    step_order,
                });
            }
            DripChange::RemoveStep(index) => {
                if self.steps.remove(index) {
                    self.renumber();
                }
            }
            DripChange::Reset => return DripDraft::default(),
        }
        self
    }

    /// Keep `step_order` contiguous starting at 1 after a removal.
    ///
    fn renumber(&mut self) {
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.step_order = i as i64 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_field_keeps_previous_value_on_invalid_input() {
        let mut field = IntField::new(5);
        field.set("abc", i64::MAX);
        assert_eq!(field.value(), 5);
        assert_eq!(field.raw(), "abc");
        field.set("-3", i64::MAX);
        assert_eq!(field.value(), 5);
        field.set("12", i64::MAX);
        assert_eq!(field.value(), 12);
    }

    #[test]
    fn int_field_rejects_above_max() {
        let mut field = IntField::new(50);
        field.set("120", 100);
        assert_eq!(field.value(), 50);
        field.set("100", 100);
        assert_eq!(field.value(), 100);
    }

    #[test]
    fn float_field_rejects_non_finite_and_non_positive() {
        let mut field = FloatField::new(1.0);
        field.set("NaN");
        assert_eq!(field.value(), 1.0);
        field.set("inf");
        assert_eq!(field.value(), 1.0);
        field.set("0");
        assert_eq!(field.value(), 1.0);
        field.set("2.5");
        assert_eq!(field.value(), 2.5);
    }

    #[test]
    fn campaign_reset_is_idempotent() {
        let draft = CampaignDraft::default()
            .apply(CampaignChange::Name("Spring push".to_string()))
            .apply(CampaignChange::ToggleAccount(3));
        let once = draft.apply(CampaignChange::Reset);
        let twice = once.clone().apply(CampaignChange::Reset);
        assert_eq!(once, twice);
        assert_eq!(once, CampaignDraft::default());
    }

    #[test]
    fn campaign_account_toggle() {
        let draft = CampaignDraft::default()
            .apply(CampaignChange::ToggleAccount(1))
            .apply(CampaignChange::ToggleAccount(2))
            .apply(CampaignChange::ToggleAccount(1));
        assert_eq!(draft.account_ids, vec![2]);
    }

    #[test]
    fn campaign_set_accounts_dedupes_preserving_order() {
        let draft = CampaignDraft::default()
            .apply(CampaignChange::SetAccounts(vec![2, 1, 2, 3, 1]));
        assert_eq!(draft.account_ids, vec![2, 1, 3]);
    }

    #[test]
    fn campaign_rotation_step_editing() {
        let draft = CampaignDraft::default()
            .apply(CampaignChange::AddRotationStep)
            .apply(CampaignChange::RotationStepTemplate {
                index: 0,
                template_id: "3".to_string(),
            })
            .apply(CampaignChange::RotationStepCount {
                index: 0,
                raw: "5".to_string(),
            });
        assert_eq!(draft.rotation_steps.len(), 2);
        assert_eq!(draft.rotation_steps.get(0).unwrap().template_id, "3");
        assert_eq!(draft.rotation_steps.get(0).unwrap().count.value(), 5);

        // The last rotation step cannot be removed.
        let draft = draft
            .apply(CampaignChange::RemoveRotationStep(1))
            .apply(CampaignChange::RemoveRotationStep(0));
        assert_eq!(draft.rotation_steps.len(), 1);
    }

    #[test]
    fn auto_rotation_template_toggle() {
        let draft = CampaignDraft::default()
            .apply(CampaignChange::ToggleAutoTemplate("1".to_string()))
            .apply(CampaignChange::ToggleAutoTemplate("2".to_string()))
            .apply(CampaignChange::ToggleAutoTemplate("1".to_string()));
        assert_eq!(draft.auto_rotation.template_ids, vec!["2".to_string()]);
    }

    #[test]
    fn ab_test_opens_with_two_even_variants() {
        let draft = AbTestDraft::default();
        assert_eq!(draft.variants.len(), 2);
        assert_eq!(draft.variants.get(0).unwrap().weight.value(), 50);
        assert_eq!(draft.variants.get(1).unwrap().weight.value(), 50);
    }

    #[test]
    fn ab_test_remove_is_noop_at_two_variants() {
        let draft = AbTestDraft::default().apply(AbTestChange::RemoveVariant(0));
        assert_eq!(draft.variants.len(), 2);

        let draft = draft
            .apply(AbTestChange::AddVariant)
            .apply(AbTestChange::RemoveVariant(2));
        assert_eq!(draft.variants.len(), 2);
    }

    #[test]
    fn ab_test_added_variant_defaults_to_zero_weight() {
        let draft = AbTestDraft::default().apply(AbTestChange::AddVariant);
        assert_eq!(draft.variants.get(2).unwrap().weight.value(), 0);
    }

    #[test]
    fn drip_steps_are_numbered_on_append() {
        let draft = DripDraft::default()
            .apply(DripChange::PendingTemplate("1".to_string()))
            .apply(DripChange::AppendStep)
            .apply(DripChange::PendingTemplate("2".to_string()))
            .apply(DripChange::PendingDelay("30".to_string()))
            .apply(DripChange::AppendStep);
        assert_eq!(draft.steps.len(), 2);
        assert_eq!(draft.steps.get(0).unwrap().step_order, 1);
        assert_eq!(draft.steps.get(1).unwrap().step_order, 2);
        assert_eq!(draft.steps.get(1).unwrap().delay_minutes.value(), 30);
        // Staging area clears after each append.
        assert_eq!(draft.pending, PendingDripStep::default());
    }

    #[test]
    fn drip_removal_renumbers_remaining_steps() {
        let draft = DripDraft::default()
            .apply(DripChange::PendingTemplate("1".to_string()))
            .apply(DripChange::AppendStep)
            .apply(DripChange::PendingTemplate("2".to_string()))
            .apply(DripChange::AppendStep)
            .apply(DripChange::PendingTemplate("3".to_string()))
            .apply(DripChange::AppendStep)
            .apply(DripChange::RemoveStep(1));
        assert_eq!(draft.steps.len(), 2);
        assert_eq!(draft.steps.get(0).unwrap().template_id, "1");
        assert_eq!(draft.steps.get(1).unwrap().template_id, "3");
        assert_eq!(draft.steps.get(0).unwrap().step_order, 1);
        assert_eq!(draft.steps.get(1).unwrap().step_order, 2);
    }

    #[test]
    fn drip_reset_is_idempotent() {
        let draft = DripDraft::default()
            .apply(DripChange::Name("Onboarding".to_string()))
            .apply(DripChange::Reset);
        assert_eq!(draft, DripDraft::default());
        assert_eq!(draft.clone().apply(DripChange::Reset), draft);
    }
}
