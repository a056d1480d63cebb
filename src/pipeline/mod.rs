//! Request pipeline for the PAYE Engine.
//!
//! This module sequences the collaborators and the calculator, translates
//! collaborator payloads into canonical types, and tracks which stage a
//! request reached.

mod adapter;
mod orchestrator;
mod stage;

pub use adapter::{parse_tax_details, parse_user_input};
pub use orchestrator::{Pipeline, PipelineError, PipelineOutcome};
pub use stage::PipelineStage;
