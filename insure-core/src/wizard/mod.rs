//! Multi-step policy application flow.

mod controller;
mod step;

pub use controller::{CompletedSubmission, WizardController, WizardError};
pub use step::Step;
