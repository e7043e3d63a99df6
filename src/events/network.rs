use crate::api::{
    ApiError, Backend, DelaySettingsRequest, FilterSettingsRequest, ReplyRequest,
    TemplateCreateRequest,
};
use crate::poll::{PollKind, PollTarget, Poller};
use crate::state::submit::{build_ab_test_request, build_campaign_request, build_drip_request};
use crate::state::{Notice, State, SubmitPhase};
use anyhow::Result;
use log::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    /// Load the option lists every creation form needs.
    Bootstrap,
    FetchAccounts,
    FetchLists,
    FetchTemplates,
    FetchCampaigns,
    FetchAbTests,
    FetchDrips,
    FetchScheduledJobs,
    FetchDelaySettings,
    FetchFilterSettings,
    /// Submit the campaign draft.
    StartCampaign,
    StopCampaign {
        id: i64,
    },
    DeleteCampaign {
        id: i64,
    },
    /// Submit the A/B test draft.
    CreateAbTest,
    DeleteAbTest {
        id: i64,
    },
    /// Submit the drip draft.
    CreateDrip,
    StartDrip {
        id: i64,
    },
    PauseDrip {
        id: i64,
    },
    CreateTemplate {
        name: String,
        content: String,
    },
    DeleteTemplate {
        id: i64,
    },
    UploadList {
        path: PathBuf,
    },
    DeleteList {
        id: i64,
    },
    DeleteAccount {
        id: i64,
    },
    /// Probe one account's session and refresh its stored health status.
    CheckAccountHealth {
        id: i64,
    },
    CancelScheduled {
        campaign_id: i64,
    },
    SaveDelaySettings(DelaySettingsRequest),
    SaveFilterSettings(FilterSettingsRequest),
    FetchDialogs {
        account_id: i64,
    },
    SendReply {
        account_id: i64,
        peer_id: i64,
        message: String,
    },
    /// The campaign list view became active: start its poller.
    WatchCampaigns,
    UnwatchCampaigns,
    WatchScheduledJobs,
    UnwatchScheduledJobs,
    /// A conversation was opened: poll its messages while it stays open.
    WatchDialog {
        account_id: i64,
        peer_id: i64,
    },
    UnwatchDialog,
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    backend: &'a Backend,
    campaign_poller: Option<Poller>,
    job_poller: Option<Poller>,
    inbox_poller: Option<Poller>,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, backend: &'a Backend) -> Self {
        Handler {
            state,
            backend,
            campaign_poller: None,
            job_poller: None,
            inbox_poller: None,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Bootstrap => self.bootstrap().await?,
            Event::FetchAccounts => self.fetch_accounts().await?,
            Event::FetchLists => self.fetch_lists().await?,
            Event::FetchTemplates => self.fetch_templates().await?,
            Event::FetchCampaigns => self.fetch_campaigns().await?,
            Event::FetchAbTests => self.fetch_ab_tests().await?,
            Event::FetchDrips => self.fetch_drips().await?,
            Event::FetchScheduledJobs => self.fetch_scheduled_jobs().await?,
            Event::FetchDelaySettings => self.fetch_delay_settings().await?,
            Event::FetchFilterSettings => self.fetch_filter_settings().await?,
            Event::StartCampaign => self.start_campaign().await?,
            Event::StopCampaign { id } => self.stop_campaign(id).await?,
            Event::DeleteCampaign { id } => self.delete_campaign(id).await?,
            Event::CreateAbTest => self.create_ab_test().await?,
            Event::DeleteAbTest { id } => self.delete_ab_test(id).await?,
            Event::CreateDrip => self.create_drip().await?,
            Event::StartDrip { id } => self.start_drip(id).await?,
            Event::PauseDrip { id } => self.pause_drip(id).await?,
            Event::CreateTemplate { name, content } => {
                self.create_template(name, content).await?
            }
            Event::DeleteTemplate { id } => self.delete_template(id).await?,
            Event::UploadList { path } => self.upload_list(path).await?,
            Event::DeleteList { id } => self.delete_list(id).await?,
            Event::DeleteAccount { id } => self.delete_account(id).await?,
            Event::CheckAccountHealth { id } => self.check_account_health(id).await?,
            Event::CancelScheduled { campaign_id } => self.cancel_scheduled(campaign_id).await?,
            Event::SaveDelaySettings(request) => self.save_delay_settings(request).await?,
            Event::SaveFilterSettings(request) => self.save_filter_settings(request).await?,
            Event::FetchDialogs { account_id } => self.fetch_dialogs(account_id).await?,
            Event::SendReply {
                account_id,
                peer_id,
                message,
            } => self.send_reply(account_id, peer_id, message).await?,
            Event::WatchCampaigns => self.watch_campaigns().await,
            Event::UnwatchCampaigns => self.unwatch_campaigns().await,
            Event::WatchScheduledJobs => self.watch_scheduled_jobs().await,
            Event::UnwatchScheduledJobs => self.unwatch_scheduled_jobs().await,
            Event::WatchDialog {
                account_id,
                peer_id,
            } => self.watch_dialog(account_id, peer_id).await,
            Event::UnwatchDialog => self.unwatch_dialog().await,
        }
        Ok(())
    }

    /// Load every option list the creation forms depend on, then the
    /// campaign list itself.
    ///
    async fn bootstrap(&mut self) -> Result<()> {
        info!("Preparing initial application data...");
        self.fetch_lists().await?;
        self.fetch_templates().await?;
        self.fetch_accounts().await?;
        self.fetch_ab_tests().await?;
        self.fetch_campaigns().await?;
        info!("Loaded initial application data.");
        Ok(())
    }

    async fn fetch_accounts(&mut self) -> Result<()> {
        let accounts = self.backend.accounts().await?;
        info!("Received {} sender accounts.", accounts.len());
        self.state.lock().await.set_accounts(accounts);
        Ok(())
    }

    async fn fetch_lists(&mut self) -> Result<()> {
        let lists = self.backend.contact_lists().await?;
        info!("Received {} contact lists.", lists.len());
        self.state.lock().await.set_contact_lists(lists);
        Ok(())
    }

    async fn fetch_templates(&mut self) -> Result<()> {
        let templates = self.backend.templates().await?;
        info!("Received {} message templates.", templates.len());
        self.state.lock().await.set_templates(templates);
        Ok(())
    }

    async fn fetch_campaigns(&mut self) -> Result<()> {
        let campaigns = self.backend.campaigns().await?;
        info!("Received {} campaigns.", campaigns.len());
        self.state.lock().await.set_campaigns(campaigns);
        Ok(())
    }

    async fn fetch_ab_tests(&mut self) -> Result<()> {
        let tests = self.backend.ab_tests().await?;
        info!("Received {} A/B tests.", tests.len());
        self.state.lock().await.set_ab_tests(tests);
        Ok(())
    }

    async fn fetch_drips(&mut self) -> Result<()> {
        let drips = self.backend.drip_campaigns().await?;
        info!("Received {} drip campaigns.", drips.len());
        self.state.lock().await.set_drip_campaigns(drips);
        Ok(())
    }

    async fn fetch_scheduled_jobs(&mut self) -> Result<()> {
        let jobs = self.backend.scheduled_jobs().await?;
        info!("Received {} scheduled jobs.", jobs.len());
        self.state.lock().await.set_scheduled_jobs(jobs);
        Ok(())
    }

    async fn fetch_delay_settings(&mut self) -> Result<()> {
        let settings = self.backend.delay_settings().await?;
        self.state.lock().await.set_delay_settings(settings);
        Ok(())
    }

    async fn fetch_filter_settings(&mut self) -> Result<()> {
        let settings = self.backend.filter_settings().await?;
        self.state.lock().await.set_filter_settings(settings);
        Ok(())
    }

    /// Validate the campaign draft, submit it, and map the outcome into
    /// user-visible state. A validation failure never sends a request and a
    /// request failure leaves the draft exactly as entered.
    ///
    async fn start_campaign(&mut self) -> Result<()> {
        let request = {
            let mut state = self.state.lock().await;
            match build_campaign_request(state.campaign_draft()) {
                Ok(request) => {
                    state.set_submit_phase(SubmitPhase::Submitting);
                    request
                }
                Err(e) => {
                    warn!("Campaign draft failed validation: {}", e);
                    state.set_notice(Notice::Error(e.to_string()));
                    return Ok(());
                }
            }
        };

        info!("Starting campaign '{}'...", request.name);
        let scheduled = request.scheduled_for.clone();
        match self.backend.start_campaign(&request).await {
            Ok(_) => {
                {
                    let mut state = self.state.lock().await;
                    state.set_submit_phase(SubmitPhase::Idle);
                    state.apply_campaign_change(crate::state::CampaignChange::Reset);
                    state.set_notice(Notice::Success(match &scheduled {
                        Some(instant) => {
                            format!("Campaign '{}' scheduled for {}.", request.name, instant)
                        }
                        None => format!("Campaign '{}' started.", request.name),
                    }));
                }
                self.fetch_campaigns().await
            }
            Err(e) => self.fail_submission("Failed to start campaign", e).await,
        }
    }

    async fn stop_campaign(&mut self, id: i64) -> Result<()> {
        info!("Stopping campaign {}...", id);
        match self.backend.stop_campaign(id).await {
            Ok(_) => self.fetch_campaigns().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to stop campaign: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn delete_campaign(&mut self, id: i64) -> Result<()> {
        info!("Deleting campaign {}...", id);
        match self.backend.delete_campaign(id).await {
            Ok(_) => self.fetch_campaigns().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to delete campaign: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn create_ab_test(&mut self) -> Result<()> {
        let request = {
            let mut state = self.state.lock().await;
            match build_ab_test_request(state.ab_test_draft()) {
                Ok(request) => {
                    state.set_submit_phase(SubmitPhase::Submitting);
                    request
                }
                Err(e) => {
                    warn!("A/B test draft failed validation: {}", e);
                    state.set_notice(Notice::Error(e.to_string()));
                    return Ok(());
                }
            }
        };

        info!("Creating A/B test '{}'...", request.name);
        match self.backend.create_ab_test(&request).await {
            Ok(_) => {
                {
                    let mut state = self.state.lock().await;
                    state.set_submit_phase(SubmitPhase::Idle);
                    state.apply_ab_test_change(crate::state::AbTestChange::Reset);
                    state.set_notice(Notice::Success(format!(
                        "A/B test '{}' created.",
                        request.name
                    )));
                }
                self.fetch_ab_tests().await
            }
            Err(e) => self.fail_submission("Failed to create A/B test", e).await,
        }
    }

    async fn delete_ab_test(&mut self, id: i64) -> Result<()> {
        info!("Deleting A/B test {}...", id);
        match self.backend.delete_ab_test(id).await {
            Ok(_) => self.fetch_ab_tests().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to delete A/B test: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn create_drip(&mut self) -> Result<()> {
        let request = {
            let mut state = self.state.lock().await;
            match build_drip_request(state.drip_draft()) {
                Ok(request) => {
                    state.set_submit_phase(SubmitPhase::Submitting);
                    request
                }
                Err(e) => {
                    warn!("Drip draft failed validation: {}", e);
                    state.set_notice(Notice::Error(e.to_string()));
                    return Ok(());
                }
            }
        };

        info!("Creating drip campaign '{}'...", request.name);
        match self.backend.create_drip(&request).await {
            Ok(_) => {
                {
                    let mut state = self.state.lock().await;
                    state.set_submit_phase(SubmitPhase::Idle);
                    state.apply_drip_change(crate::state::DripChange::Reset);
                    state.set_notice(Notice::Success(format!(
                        "Drip campaign '{}' created.",
                        request.name
                    )));
                }
                self.fetch_drips().await
            }
            Err(e) => {
                self.fail_submission("Failed to create drip campaign", e)
                    .await
            }
        }
    }

    async fn start_drip(&mut self, id: i64) -> Result<()> {
        info!("Starting drip campaign {}...", id);
        match self.backend.start_drip(id).await {
            Ok(_) => self.fetch_drips().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to start drip campaign: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn pause_drip(&mut self, id: i64) -> Result<()> {
        info!("Pausing drip campaign {}...", id);
        match self.backend.pause_drip(id).await {
            Ok(_) => self.fetch_drips().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to pause drip campaign: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn create_template(&mut self, name: String, content: String) -> Result<()> {
        info!("Creating message template '{}'...", name);
        let request = TemplateCreateRequest { name, content };
        match self.backend.create_template(&request).await {
            Ok(_) => self.fetch_templates().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to create template: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn delete_template(&mut self, id: i64) -> Result<()> {
        info!("Deleting message template {}...", id);
        match self.backend.delete_template(id).await {
            Ok(_) => self.fetch_templates().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to delete template: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn upload_list(&mut self, path: PathBuf) -> Result<()> {
        info!("Uploading contact list from {:?}...", path);
        match self.backend.upload_list(&path).await {
            Ok(_) => self.fetch_lists().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to upload list: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn delete_list(&mut self, id: i64) -> Result<()> {
        info!("Deleting contact list {}...", id);
        match self.backend.delete_list(id).await {
            Ok(_) => self.fetch_lists().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to delete list: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn delete_account(&mut self, id: i64) -> Result<()> {
        info!("Deleting account {}...", id);
        match self.backend.delete_account(id).await {
            Ok(_) => self.fetch_accounts().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to delete account: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    /// Run a health probe and pull the roster again so the updated status the
    /// backend persisted is reflected locally.
    ///
    async fn check_account_health(&mut self, id: i64) -> Result<()> {
        info!("Checking health of account {}...", id);
        match self.backend.check_account_health(id).await {
            Ok(report) => {
                {
                    let mut state = self.state.lock().await;
                    state.set_notice(Notice::Success(match report.status.as_str() {
                        "alive" => "Account is healthy.".to_string(),
                        "flood_wait" => "Account has an active flood wait.".to_string(),
                        "banned" => "Account is banned.".to_string(),
                        status => format!("Account status: {}", status),
                    }));
                }
                self.fetch_accounts().await
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to check account health: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn cancel_scheduled(&mut self, campaign_id: i64) -> Result<()> {
        info!("Cancelling scheduled campaign {}...", campaign_id);
        match self.backend.cancel_scheduled(campaign_id).await {
            Ok(_) => self.fetch_scheduled_jobs().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to cancel schedule: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn save_delay_settings(&mut self, request: DelaySettingsRequest) -> Result<()> {
        match self.backend.save_delay_settings(&request).await {
            Ok(_) => self.fetch_delay_settings().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to save delay settings: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn save_filter_settings(&mut self, request: FilterSettingsRequest) -> Result<()> {
        match self.backend.save_filter_settings(&request).await {
            Ok(_) => self.fetch_filter_settings().await,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to save filter settings: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn fetch_dialogs(&mut self, account_id: i64) -> Result<()> {
        info!("Fetching dialogs for account {}...", account_id);
        let dialogs = self.backend.dialogs(account_id).await?;
        self.state.lock().await.set_dialogs(dialogs);
        Ok(())
    }

    async fn send_reply(&mut self, account_id: i64, peer_id: i64, message: String) -> Result<()> {
        info!("Sending reply into dialog {}...", peer_id);
        let request = ReplyRequest {
            account_id,
            peer_id,
            message,
        };
        match self.backend.send_reply(&request).await {
            Ok(_) => {
                // Refresh the conversation so the sent message shows up.
                let messages = self.backend.messages(account_id, peer_id).await?;
                self.state.lock().await.set_messages(messages);
                Ok(())
            }
            Err(e) => {
                let mut state = self.state.lock().await;
                state.set_notice(Notice::Error(format!(
                    "Failed to send reply: {}",
                    e.user_message()
                )));
                Ok(())
            }
        }
    }

    async fn watch_campaigns(&mut self) {
        self.campaign_poller = Some(Poller::spawn(
            Arc::clone(self.state),
            self.backend.clone(),
            PollTarget::Campaigns,
        ));
    }

    async fn unwatch_campaigns(&mut self) {
        self.state
            .lock()
            .await
            .bump_poll_epoch(PollKind::Campaigns);
        self.campaign_poller = None;
    }

    async fn watch_scheduled_jobs(&mut self) {
        self.job_poller = Some(Poller::spawn(
            Arc::clone(self.state),
            self.backend.clone(),
            PollTarget::ScheduledJobs,
        ));
    }

    async fn unwatch_scheduled_jobs(&mut self) {
        self.state
            .lock()
            .await
            .bump_poll_epoch(PollKind::ScheduledJobs);
        self.job_poller = None;
    }

    /// Point the inbox poller at a new conversation. The previous poller is
    /// invalidated through its epoch before being dropped, so a response it
    /// still has in flight cannot land on the new selection.
    ///
    async fn watch_dialog(&mut self, account_id: i64, peer_id: i64) {
        {
            let mut state = self.state.lock().await;
            state.bump_poll_epoch(PollKind::Inbox);
            state.select_dialog(account_id, peer_id);
        }
        self.inbox_poller = Some(Poller::spawn(
            Arc::clone(self.state),
            self.backend.clone(),
            PollTarget::Messages {
                account_id,
                peer_id,
            },
        ));
    }

    async fn unwatch_dialog(&mut self) {
        {
            let mut state = self.state.lock().await;
            state.bump_poll_epoch(PollKind::Inbox);
            state.clear_dialog_selection();
        }
        self.inbox_poller = None;
    }

    /// Shared failure path for the three submissions: back to idle, surface
    /// the server's detail, keep the draft as entered.
    ///
    async fn fail_submission(&mut self, prefix: &str, error: ApiError) -> Result<()> {
        error!("{}: {}", prefix, error);
        let mut state = self.state.lock().await;
        state.set_submit_phase(SubmitPhase::Idle);
        state.set_notice(Notice::Error(format!(
            "{}: {}",
            prefix,
            error.user_message()
        )));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AbTestChange, CampaignChange};
    use httpmock::MockServer;
    use serde_json::json;

    fn state() -> Arc<Mutex<State>> {
        Arc::new(Mutex::new(State::new()))
    }

    #[tokio::test]
    async fn invalid_draft_sends_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/campaigns/start");
                then.status(200).json_body(json!({ "status": "started" }));
            })
            .await;

        let state = state();
        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler.handle(Event::StartCampaign).await.unwrap();

        mock.assert_hits_async(0).await;
        let state = state.lock().await;
        assert_eq!(state.submit_phase(), SubmitPhase::Idle);
        assert!(matches!(state.notice(), Some(Notice::Error(_))));
    }

    #[tokio::test]
    async fn successful_submission_resets_draft_and_refetches() {
        let server = MockServer::start_async().await;
        let start_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/campaigns/start");
                then.status(200)
                    .json_body(json!({ "status": "started", "campaign_id": 3 }));
            })
            .await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/campaigns/");
                then.status(200).json_body(json!([
                    { "id": 3, "name": "Spring push", "status": "running" }
                ]));
            })
            .await;

        let state = state();
        {
            let mut guard = state.lock().await;
            guard.apply_campaign_change(CampaignChange::Name("Spring push".to_string()));
            guard.apply_campaign_change(CampaignChange::List("4".to_string()));
            guard.apply_campaign_change(CampaignChange::Template("7".to_string()));
            guard.apply_campaign_change(CampaignChange::ToggleAccount(1));
        }

        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler.handle(Event::StartCampaign).await.unwrap();

        start_mock.assert_async().await;
        list_mock.assert_async().await;
        let state = state.lock().await;
        assert_eq!(state.campaign_draft(), &crate::state::CampaignDraft::default());
        assert_eq!(state.campaigns().len(), 1);
        assert!(matches!(state.notice(), Some(Notice::Success(_))));
        assert_eq!(state.submit_phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn failed_submission_keeps_draft_and_surfaces_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/campaigns/start");
                then.status(404)
                    .json_body(json!({ "detail": "User list not found" }));
            })
            .await;

        let state = state();
        {
            let mut guard = state.lock().await;
            guard.apply_campaign_change(CampaignChange::Name("Spring push".to_string()));
            guard.apply_campaign_change(CampaignChange::List("4".to_string()));
            guard.apply_campaign_change(CampaignChange::Template("7".to_string()));
            guard.apply_campaign_change(CampaignChange::ToggleAccount(1));
        }
        let draft_before = state.lock().await.campaign_draft().clone();

        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler.handle(Event::StartCampaign).await.unwrap();

        let state = state.lock().await;
        assert_eq!(state.campaign_draft(), &draft_before);
        assert_eq!(
            state.notice(),
            Some(&Notice::Error(
                "Failed to start campaign: User list not found".to_string()
            ))
        );
        assert_eq!(state.submit_phase(), SubmitPhase::Idle);
    }

    #[tokio::test]
    async fn ab_test_submission_round_trip() {
        let server = MockServer::start_async().await;
        let create_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/ab_test/create").json_body(json!({
                    "name": "Welcome Test",
                    "variants": [
                        { "template_id": 1, "weight": 50 },
                        { "template_id": 2, "weight": 50 }
                    ]
                }));
                then.status(200)
                    .json_body(json!({ "status": "created", "id": 1 }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/ab_test/list");
                then.status(200).json_body(json!([]));
            })
            .await;

        let state = state();
        {
            let mut guard = state.lock().await;
            guard.apply_ab_test_change(AbTestChange::Name("Welcome Test".to_string()));
            guard.apply_ab_test_change(AbTestChange::VariantTemplate {
                index: 0,
                template_id: "1".to_string(),
            });
            guard.apply_ab_test_change(AbTestChange::VariantTemplate {
                index: 1,
                template_id: "2".to_string(),
            });
        }

        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler.handle(Event::CreateAbTest).await.unwrap();

        create_mock.assert_async().await;
        let state = state.lock().await;
        assert_eq!(state.ab_test_draft(), &crate::state::AbTestDraft::default());
    }

    #[tokio::test]
    async fn deleted_account_disappears_from_roster() {
        let server = MockServer::start_async().await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/accounts/5");
                then.status(200).json_body(json!({ "detail": "Account deleted" }));
            })
            .await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/accounts/");
                then.status(200).json_body(json!([]));
            })
            .await;

        let state = state();
        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler.handle(Event::DeleteAccount { id: 5 }).await.unwrap();

        delete_mock.assert_async().await;
        list_mock.assert_async().await;
        assert!(state.lock().await.accounts().is_empty());
    }

    #[tokio::test]
    async fn health_check_refreshes_accounts_and_reports_status() {
        let server = MockServer::start_async().await;
        let check_mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/accounts/3/check-health");
                then.status(200)
                    .json_body(json!({ "status": "alive", "last_check": "2026-08-30T10:00:00" }));
            })
            .await;
        let list_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/accounts/");
                then.status(200).json_body(json!([
                    { "id": 3, "phone_number": "+15550100", "is_active": true, "health_status": "alive" }
                ]));
            })
            .await;

        let state = state();
        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler
            .handle(Event::CheckAccountHealth { id: 3 })
            .await
            .unwrap();

        check_mock.assert_async().await;
        list_mock.assert_async().await;
        let state = state.lock().await;
        assert_eq!(state.accounts()[0].health_status.as_deref(), Some("alive"));
        assert_eq!(
            state.notice(),
            Some(&Notice::Success("Account is healthy.".to_string()))
        );
    }

    #[tokio::test]
    async fn watch_dialog_selects_and_polls() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/inbox/1/messages/42");
                then.status(200).json_body(json!([
                    { "id": 9, "sender_id": 42, "text": "hey", "date": "2026-08-30", "is_outgoing": false }
                ]));
            })
            .await;

        let state = state();
        let backend = Backend::new(&server.base_url(), None);
        let mut handler = Handler::new(&state, &backend);
        handler
            .handle(Event::WatchDialog {
                account_id: 1,
                peer_id: 42,
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        handler.handle(Event::UnwatchDialog).await.unwrap();

        let state = state.lock().await;
        assert!(state.messages().is_empty());
        assert_eq!(state.selected_dialog(), None);
    }
}
