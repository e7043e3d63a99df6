//! Application state management module.
//!
//! This module contains the core state management for the console, including:
//! - Main `State` struct that holds all application data
//! - Draft types and their reducer-style transitions
//! - Ordered sub-entity editing (`StepList`)
//! - Draft validation and wire payload construction
//! - State error handling

mod error;
mod store;

pub mod draft;
pub mod steps;
pub mod submit;

pub use draft::{
    AbTestChange, AbTestDraft, CampaignChange, CampaignDraft, CampaignMode, DripChange, DripDraft,
};
pub use error::StateError;
pub use steps::StepList;
pub use store::State;
pub use submit::{Notice, SubmitPhase, ValidationError};
