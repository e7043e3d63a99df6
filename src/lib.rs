//! Client core for operating a bulk Telegram messaging backend.
//!
//! This crate contains everything the operator console needs short of
//! rendering: a typed client for the backend's REST API, draft state for the
//! campaign / A/B test / drip creation forms, validation and payload building
//! for submissions, and cancellable polling for the read-mostly views.
//!
//! A frontend embeds the crate through [`app::App`], which owns the shared
//! [`state::State`] and a channel of [`events::network::Event`]s processed on
//! a dedicated network thread.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod poll;
pub mod state;
