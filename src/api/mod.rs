mod client;
mod error;
mod request;
mod resource;

pub use error::ApiError;
pub use request::*;
pub use resource::*;

use client::Client;
use log::*;
use std::path::Path;

/// Responsible for asynchronous interaction with the messaging backend,
/// conforming response data to explicitly-defined resource types.
///
#[derive(Clone)]
pub struct Backend {
    client: Client,
}

impl Backend {
    /// Returns a new instance for the given base URL and optional API token.
    ///
    pub fn new(base_url: &str, api_token: Option<&str>) -> Backend {
        debug!("Initializing backend client for {}...", base_url);
        Backend {
            client: Client::new(base_url, api_token),
        }
    }

    /// Returns all sender accounts.
    ///
    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        debug!("Requesting sender accounts...");
        let accounts: Vec<Account> = self.client.get("/accounts/").await?;
        debug!("Retrieved {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Delete a sender account.
    ///
    pub async fn delete_account(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting account {}...", id);
        self.client.delete(&format!("/accounts/{}", id)).await
    }

    /// Probe the session behind a sender account. The backend persists the
    /// resulting health status, so callers should refetch the account list
    /// afterwards.
    ///
    pub async fn check_account_health(&self, id: i64) -> Result<HealthReport, ApiError> {
        debug!("Checking health of account {}...", id);
        self.client
            .post(&format!("/accounts/{}/check-health", id), None)
            .await
    }

    /// Returns all contact lists.
    ///
    pub async fn contact_lists(&self) -> Result<Vec<ContactList>, ApiError> {
        debug!("Requesting contact lists...");
        self.client.get("/lists/").await
    }

    /// Upload a contact list file as multipart form data.
    ///
    pub async fn upload_list(&self, path: &Path) -> Result<(), ApiError> {
        debug!("Uploading contact list from {:?}...", path);
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "list.csv".to_string());
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client.upload("/lists/upload", form).await
    }

    /// Delete a contact list.
    ///
    pub async fn delete_list(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting contact list {}...", id);
        self.client.delete(&format!("/lists/{}", id)).await
    }

    /// Returns all message templates.
    ///
    pub async fn templates(&self) -> Result<Vec<MessageTemplate>, ApiError> {
        debug!("Requesting message templates...");
        self.client.get("/messages/").await
    }

    /// Create a message template.
    ///
    pub async fn create_template(&self, request: &TemplateCreateRequest) -> Result<(), ApiError> {
        debug!("Creating message template '{}'...", request.name);
        let body = serde_json::to_value(request)?;
        self.client.post::<serde_json::Value>("/messages/", Some(body)).await?;
        Ok(())
    }

    /// Delete a message template.
    ///
    pub async fn delete_template(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting message template {}...", id);
        self.client.delete(&format!("/messages/{}", id)).await
    }

    /// Returns all campaigns with their current status.
    ///
    pub async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        debug!("Requesting campaigns...");
        self.client.get("/campaigns/").await
    }

    /// Create and start (or schedule) a campaign.
    ///
    pub async fn start_campaign(&self, request: &CampaignStartRequest) -> Result<Ack, ApiError> {
        debug!("Starting campaign '{}'...", request.name);
        let body = serde_json::to_value(request)?;
        self.client.post("/campaigns/start", Some(body)).await
    }

    /// Stop a running campaign.
    ///
    pub async fn stop_campaign(&self, id: i64) -> Result<Ack, ApiError> {
        debug!("Stopping campaign {}...", id);
        self.client.post(&format!("/campaigns/stop/{}", id), None).await
    }

    /// Delete a campaign.
    ///
    pub async fn delete_campaign(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting campaign {}...", id);
        self.client.delete(&format!("/campaigns/{}", id)).await
    }

    /// Returns all A/B tests with their variants.
    ///
    pub async fn ab_tests(&self) -> Result<Vec<AbTest>, ApiError> {
        debug!("Requesting A/B tests...");
        self.client.get("/ab_test/list").await
    }

    /// Create an A/B test.
    ///
    pub async fn create_ab_test(&self, request: &AbTestCreateRequest) -> Result<Ack, ApiError> {
        debug!("Creating A/B test '{}'...", request.name);
        let body = serde_json::to_value(request)?;
        self.client.post("/ab_test/create", Some(body)).await
    }

    /// Delete an A/B test.
    ///
    pub async fn delete_ab_test(&self, id: i64) -> Result<(), ApiError> {
        debug!("Deleting A/B test {}...", id);
        self.client.delete(&format!("/ab_test/{}", id)).await
    }

    /// Returns all drip campaigns.
    ///
    pub async fn drip_campaigns(&self) -> Result<Vec<DripCampaign>, ApiError> {
        debug!("Requesting drip campaigns...");
        self.client.get("/drip/").await
    }

    /// Create a drip campaign in draft status.
    ///
    pub async fn create_drip(&self, request: &DripCreateRequest) -> Result<DripCampaign, ApiError> {
        debug!("Creating drip campaign '{}'...", request.name);
        let body = serde_json::to_value(request)?;
        self.client.post("/drip/", Some(body)).await
    }

    /// Start enrolling a drip campaign.
    ///
    pub async fn start_drip(&self, id: i64) -> Result<(), ApiError> {
        debug!("Starting drip campaign {}...", id);
        self.client
            .post::<serde_json::Value>(&format!("/drip/{}/start", id), None)
            .await?;
        Ok(())
    }

    /// Pause a running drip campaign.
    ///
    pub async fn pause_drip(&self, id: i64) -> Result<(), ApiError> {
        debug!("Pausing drip campaign {}...", id);
        self.client
            .post::<serde_json::Value>(&format!("/drip/{}/pause", id), None)
            .await?;
        Ok(())
    }

    /// Returns campaigns awaiting their scheduled start time.
    ///
    pub async fn scheduled_jobs(&self) -> Result<Vec<Campaign>, ApiError> {
        debug!("Requesting scheduled jobs...");
        self.client.get("/scheduler/").await
    }

    /// Cancel a scheduled campaign.
    ///
    pub async fn cancel_scheduled(&self, campaign_id: i64) -> Result<(), ApiError> {
        debug!("Cancelling scheduled campaign {}...", campaign_id);
        self.client.delete(&format!("/scheduler/{}", campaign_id)).await
    }

    /// Returns the dialog list for a sender account.
    ///
    pub async fn dialogs(&self, account_id: i64) -> Result<Vec<InboxDialog>, ApiError> {
        debug!("Requesting dialogs for account {}...", account_id);
        self.client.get(&format!("/inbox/{}/dialogs", account_id)).await
    }

    /// Returns the message history of one dialog.
    ///
    pub async fn messages(
        &self,
        account_id: i64,
        peer_id: i64,
    ) -> Result<Vec<InboxMessage>, ApiError> {
        debug!(
            "Requesting messages for account {} dialog {}...",
            account_id, peer_id
        );
        self.client
            .get(&format!("/inbox/{}/messages/{}", account_id, peer_id))
            .await
    }

    /// Send a reply into a dialog.
    ///
    pub async fn send_reply(&self, request: &ReplyRequest) -> Result<(), ApiError> {
        debug!(
            "Sending reply to peer {} from account {}...",
            request.peer_id, request.account_id
        );
        let body = serde_json::to_value(request)?;
        self.client.post::<serde_json::Value>("/inbox/reply", Some(body)).await?;
        Ok(())
    }

    /// Returns the global send-delay settings.
    ///
    pub async fn delay_settings(&self) -> Result<DelaySettings, ApiError> {
        debug!("Requesting delay settings...");
        self.client.get("/delay/").await
    }

    /// Save the global send-delay settings.
    ///
    pub async fn save_delay_settings(&self, request: &DelaySettingsRequest) -> Result<(), ApiError> {
        debug!("Saving delay settings...");
        let body = serde_json::to_value(request)?;
        self.client.post::<serde_json::Value>("/delay/", Some(body)).await?;
        Ok(())
    }

    /// Returns the recipient filter settings.
    ///
    pub async fn filter_settings(&self) -> Result<FilterSettings, ApiError> {
        debug!("Requesting filter settings...");
        self.client.get("/filters/").await
    }

    /// Save the recipient filter settings.
    ///
    pub async fn save_filter_settings(
        &self,
        request: &FilterSettingsRequest,
    ) -> Result<(), ApiError> {
        debug!("Saving filter settings...");
        let body = serde_json::to_value(request)?;
        self.client.post::<serde_json::Value>("/filters/", Some(body)).await?;
        Ok(())
    }
}
