use crate::api::Backend;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::state::State;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;

/// Oversees event processing and state management for an embedding frontend.
///
/// The frontend reads [`State`] through the shared handle and drives the
/// backend by sending [`NetworkEvent`]s; all networking happens on a
/// dedicated thread with its own runtime. Dropping the `App` closes the
/// event channel, which shuts the network thread down.
///
pub struct App {
    state: Arc<Mutex<State>>,
    net_sender: NetworkEventSender,
}

impl App {
    /// Start a new application according to the given configuration and
    /// request initial data from the backend.
    ///
    pub fn start(config: Config) -> AppResult<App> {
        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<NetworkEvent>();
        let app = App {
            state: Arc::new(Mutex::new(State::new())),
            net_sender: tx,
        };
        app.start_network(rx, &config)?;
        app.send(NetworkEvent::Bootstrap)?;
        Ok(app)
    }

    /// Shared handle to the application state.
    ///
    pub fn state(&self) -> Arc<Mutex<State>> {
        Arc::clone(&self.state)
    }

    /// Sender half of the network event channel.
    ///
    pub fn sender(&self) -> NetworkEventSender {
        self.net_sender.clone()
    }

    /// Queue a network event for processing.
    ///
    pub fn send(&self, event: NetworkEvent) -> AppResult<()> {
        self.net_sender
            .send(event)
            .map_err(|e| AppError::Channel(e.to_string()))
    }

    /// Start a separate thread for asynchronous state mutations.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver, config: &Config) -> AppResult<()> {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        let backend = Backend::new(&config.base_url, config.api_token.as_deref());
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to build network runtime")
                .block_on(async {
                    let mut network_event_handler =
                        NetworkEventHandler::new(&cloned_state, &backend);
                    while let Ok(network_event) = net_receiver.recv() {
                        match network_event_handler.handle(network_event).await {
                            Ok(_) => (),
                            Err(e) => error!("Failed to handle network event: {}", e),
                        }
                    }
                    debug!("Event channel closed, network thread exiting.");
                })
        });
        Ok(())
    }
}
