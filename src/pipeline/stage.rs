//! Pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stage in the lifecycle of a single calculation request.
///
/// Stages advance strictly in declaration order. [`PipelineStage::Failed`]
/// can be entered from any non-terminal stage.
///
/// # Example
///
/// ```
/// use paye_engine::pipeline::PipelineStage;
///
/// let stage = PipelineStage::AwaitingInput;
/// assert_eq!(stage.next(), Some(PipelineStage::InputValidated));
/// assert!(!stage.is_terminal());
/// assert!(PipelineStage::Responded.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Waiting for the User Input Service.
    AwaitingInput,
    /// User input received and validated.
    InputValidated,
    /// Waiting for the Tax Table Service.
    AwaitingTaxDetails,
    /// Tax details received and validated.
    TaxDetailsValidated,
    /// Payroll figures computed.
    Computed,
    /// Response produced.
    Responded,
    /// The request failed.
    Failed,
}

impl PipelineStage {
    /// Returns the stage that follows this one on the success path.
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::AwaitingInput => Some(PipelineStage::InputValidated),
            PipelineStage::InputValidated => Some(PipelineStage::AwaitingTaxDetails),
            PipelineStage::AwaitingTaxDetails => Some(PipelineStage::TaxDetailsValidated),
            PipelineStage::TaxDetailsValidated => Some(PipelineStage::Computed),
            PipelineStage::Computed => Some(PipelineStage::Responded),
            PipelineStage::Responded | PipelineStage::Failed => None,
        }
    }

    /// Returns true for `Responded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Responded | PipelineStage::Failed)
    }

    /// Returns the snake_case name of the stage.
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::AwaitingInput => "awaiting_input",
            PipelineStage::InputValidated => "input_validated",
            PipelineStage::AwaitingTaxDetails => "awaiting_tax_details",
            PipelineStage::TaxDetailsValidated => "tax_details_validated",
            PipelineStage::Computed => "computed",
            PipelineStage::Responded => "responded",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
