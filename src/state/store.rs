//! Shared application state.
//!
//! One `State` instance lives behind an `Arc<Mutex<..>>`; the network thread
//! and pollers apply fetched data and submission outcomes here, and an
//! embedding frontend reads it to render.

use super::draft::{
    AbTestChange, AbTestDraft, CampaignChange, CampaignDraft, DripChange, DripDraft,
};
use super::submit::{Notice, SubmitPhase};
use crate::api::{
    AbTest, Account, Campaign, ContactList, DelaySettings, DripCampaign, FilterSettings,
    InboxDialog, InboxMessage, MessageTemplate,
};
use crate::poll::PollKind;

/// Holds every piece of data the console works with: fetched resource lists,
/// the three creation drafts, the submission banner, and the per-view poll
/// epochs used to discard stale poll responses.
///
pub struct State {
    accounts: Vec<Account>,
    contact_lists: Vec<ContactList>,
    templates: Vec<MessageTemplate>,
    campaigns: Vec<Campaign>,
    ab_tests: Vec<AbTest>,
    drip_campaigns: Vec<DripCampaign>,
    scheduled_jobs: Vec<Campaign>,
    dialogs: Vec<InboxDialog>,
    messages: Vec<InboxMessage>,
    delay_settings: Option<DelaySettings>,
    filter_settings: Option<FilterSettings>,
    selected_account: Option<i64>,
    selected_dialog: Option<i64>,
    campaign_draft: CampaignDraft,
    ab_test_draft: AbTestDraft,
    drip_draft: DripDraft,
    submit_phase: SubmitPhase,
    notice: Option<Notice>,
    poll_epochs: [u64; PollKind::COUNT],
}

impl State {
    /// Return a new instance with default values.
    ///
    pub fn new() -> State {
        State {
            accounts: vec![],
            contact_lists: vec![],
            templates: vec![],
            campaigns: vec![],
            ab_tests: vec![],
            drip_campaigns: vec![],
            scheduled_jobs: vec![],
            dialogs: vec![],
            messages: vec![],
            delay_settings: None,
            filter_settings: None,
            selected_account: None,
            selected_dialog: None,
            campaign_draft: CampaignDraft::default(),
            ab_test_draft: AbTestDraft::default(),
            drip_draft: DripDraft::default(),
            submit_phase: SubmitPhase::Idle,
            notice: None,
            poll_epochs: [0; PollKind::COUNT],
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Accounts eligible as campaign senders.
    ///
    pub fn active_accounts(&self) -> Vec<&Account> {
        self.accounts.iter().filter(|a| a.is_active).collect()
    }

    pub fn set_accounts(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
    }

    pub fn contact_lists(&self) -> &[ContactList] {
        &self.contact_lists
    }

    pub fn set_contact_lists(&mut self, lists: Vec<ContactList>) {
        self.contact_lists = lists;
    }

    pub fn templates(&self) -> &[MessageTemplate] {
        &self.templates
    }

    pub fn set_templates(&mut self, templates: Vec<MessageTemplate>) {
        self.templates = templates;
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn set_campaigns(&mut self, campaigns: Vec<Campaign>) {
        self.campaigns = campaigns;
    }

    pub fn ab_tests(&self) -> &[AbTest] {
        &self.ab_tests
    }

    pub fn set_ab_tests(&mut self, tests: Vec<AbTest>) {
        self.ab_tests = tests;
    }

    pub fn drip_campaigns(&self) -> &[DripCampaign] {
        &self.drip_campaigns
    }

    pub fn set_drip_campaigns(&mut self, campaigns: Vec<DripCampaign>) {
        self.drip_campaigns = campaigns;
    }

    pub fn scheduled_jobs(&self) -> &[Campaign] {
        &self.scheduled_jobs
    }

    pub fn set_scheduled_jobs(&mut self, jobs: Vec<Campaign>) {
        self.scheduled_jobs = jobs;
    }

    pub fn dialogs(&self) -> &[InboxDialog] {
        &self.dialogs
    }

    pub fn set_dialogs(&mut self, dialogs: Vec<InboxDialog>) {
        self.dialogs = dialogs;
    }

    pub fn messages(&self) -> &[InboxMessage] {
        &self.messages
    }

    pub fn set_messages(&mut self, messages: Vec<InboxMessage>) {
        self.messages = messages;
    }

    pub fn delay_settings(&self) -> Option<&DelaySettings> {
        self.delay_settings.as_ref()
    }

    pub fn set_delay_settings(&mut self, settings: DelaySettings) {
        self.delay_settings = Some(settings);
    }

    pub fn filter_settings(&self) -> Option<&FilterSettings> {
        self.filter_settings.as_ref()
    }

    pub fn set_filter_settings(&mut self, settings: FilterSettings) {
        self.filter_settings = Some(settings);
    }

    pub fn selected_account(&self) -> Option<i64> {
        self.selected_account
    }

    pub fn selected_dialog(&self) -> Option<i64> {
        self.selected_dialog
    }

    /// Point the inbox at a dialog, clearing any previous message history.
    ///
    pub fn select_dialog(&mut self, account_id: i64, peer_id: i64) {
        self.selected_account = Some(account_id);
        self.selected_dialog = Some(peer_id);
        self.messages.clear();
    }

    pub fn clear_dialog_selection(&mut self) {
        self.selected_dialog = None;
        self.messages.clear();
    }

    pub fn campaign_draft(&self) -> &CampaignDraft {
        &self.campaign_draft
    }

    pub fn apply_campaign_change(&mut self, change: CampaignChange) {
        self.campaign_draft = std::mem::take(&mut self.campaign_draft).apply(change);
    }

    pub fn ab_test_draft(&self) -> &AbTestDraft {
        &self.ab_test_draft
    }

    pub fn apply_ab_test_change(&mut self, change: AbTestChange) {
        self.ab_test_draft = std::mem::take(&mut self.ab_test_draft).apply(change);
    }

    pub fn drip_draft(&self) -> &DripDraft {
        &self.drip_draft
    }

    pub fn apply_drip_change(&mut self, change: DripChange) {
        self.drip_draft = std::mem::take(&mut self.drip_draft).apply(change);
    }

    pub fn submit_phase(&self) -> SubmitPhase {
        self.submit_phase
    }

    pub fn set_submit_phase(&mut self, phase: SubmitPhase) {
        self.submit_phase = phase;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Current epoch for one poll target. A poller captures this at spawn
    /// and refuses to apply responses once the epoch has moved on.
    ///
    pub fn poll_epoch(&self, kind: PollKind) -> u64 {
        self.poll_epochs[kind as usize]
    }

    /// Invalidate in-flight polls for one target (view teardown or a
    /// selection change).
    ///
    pub fn bump_poll_epoch(&mut self, kind: PollKind) {
        self.poll_epochs[kind as usize] += 1;
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn active_accounts_filters_inactive() {
        let mut state = State::new();
        let mut a: Account = Faker.fake();
        a.is_active = true;
        let mut b: Account = Faker.fake();
        b.is_active = false;
        state.set_accounts(vec![a.clone(), b]);
        let active = state.active_accounts();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);
    }

    #[test]
    fn select_dialog_clears_stale_messages() {
        let mut state = State::new();
        state.set_messages(vec![Faker.fake()]);
        state.select_dialog(1, 42);
        assert!(state.messages().is_empty());
        assert_eq!(state.selected_account(), Some(1));
        assert_eq!(state.selected_dialog(), Some(42));
    }

    #[test]
    fn poll_epochs_are_independent_per_target() {
        let mut state = State::new();
        state.bump_poll_epoch(PollKind::Inbox);
        assert_eq!(state.poll_epoch(PollKind::Inbox), 1);
        assert_eq!(state.poll_epoch(PollKind::Campaigns), 0);
        assert_eq!(state.poll_epoch(PollKind::ScheduledJobs), 0);
    }

    #[test]
    fn notice_lifecycle() {
        let mut state = State::new();
        assert!(state.notice().is_none());
        state.set_notice(Notice::Error("boom".to_string()));
        assert_eq!(state.notice(), Some(&Notice::Error("boom".to_string())));
        state.dismiss_notice();
        assert!(state.notice().is_none());
    }
}
