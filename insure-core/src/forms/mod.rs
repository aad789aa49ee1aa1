//! Step views.
//!
//! Each wizard step has a [`StepView`] that describes its inputs as a
//! [`StepForm`], turns single edits into [`DraftPatch`]es, and checks that
//! required inputs are filled before the wizard moves on. The views know
//! nothing about how a form is drawn; `insure-cli` renders them in a terminal.

mod customization;
pub mod format;
mod payment;
mod personal;
mod success;
mod summary;
mod vehicle;

use std::fmt;

use thiserror::Error;

pub use customization::CustomizationView;
pub use payment::PaymentView;
pub use personal::PersonalView;
pub use success::SuccessView;
pub use summary::SummaryView;
pub use vehicle::VehicleView;

use crate::calculations::PremiumError;
use crate::models::{ApplicationDraft, DraftPatch};
use crate::wizard::{CompletedSubmission, Step, WizardController};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{} has no field named '{key}'", .step.title())]
    UnknownField { step: Step, key: String },

    #[error("{label} must be a number, got '{value}'")]
    InvalidNumber { label: &'static str, value: String },

    #[error("'{value}' is not a valid {label} option")]
    InvalidChoice { label: &'static str, value: String },

    #[error(transparent)]
    Premium(#[from] PremiumError),
}

/// A failed requiredness or range check on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One option of a select or multi-select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    /// Whole number within `min..=max`.
    Number { min: i64, max: i64 },
    /// Rupee amount; commas are accepted.
    Amount,
    Select(Vec<Choice>),
    /// Each edit toggles one option value.
    MultiSelect(Vec<Choice>),
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Selected(Vec<String>),
    Checked(bool),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Selected(values) => values.is_empty(),
            Self::Checked(checked) => !checked,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            _ => "",
        }
    }
}

/// An input on a step form, with its current value from the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
    pub required: bool,
}

impl FormField {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            value,
            required: false,
        }
    }

    pub fn text(
        key: &'static str,
        label: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::new(key, label, FieldKind::Text, FieldValue::Text(value.into()))
    }

    pub fn with_kind(
        mut self,
        kind: FieldKind,
    ) -> Self {
        self.kind = kind;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Requiredness, then the numeric range for number inputs.
    pub fn check(&self) -> Option<FieldError> {
        if self.value.is_blank() {
            return self.required.then(|| FieldError {
                key: self.key,
                message: format!("{} is required", self.label),
            });
        }

        let FieldKind::Number { min, max } = self.kind else {
            return None;
        };
        let message = match self.value.as_text().trim().parse::<i64>() {
            Ok(n) if (min..=max).contains(&n) => return None,
            Ok(_) => format!("{} must be between {min} and {max}", self.label),
            Err(_) => format!("{} must be a number", self.label),
        };
        Some(FieldError {
            key: self.key,
            message,
        })
    }
}

/// A read-only label/value line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

impl DisplayRow {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub rows: Vec<DisplayRow>,
}

/// Everything needed to draw one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepForm {
    pub step: Step,
    pub sections: Vec<Section>,
    pub fields: Vec<FormField>,
}

impl StepForm {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            sections: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn field(
        mut self,
        field: FormField,
    ) -> Self {
        self.fields.push(field);
        self
    }

    pub fn section(
        mut self,
        heading: &'static str,
        rows: Vec<DisplayRow>,
    ) -> Self {
        self.sections.push(Section { heading, rows });
        self
    }

    pub fn find(
        &self,
        key: &str,
    ) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// What a view may read while rendering.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub draft: &'a ApplicationDraft,
    pub completed: Option<&'a CompletedSubmission>,
}

impl<'a> StepContext<'a> {
    pub fn new(draft: &'a ApplicationDraft) -> Self {
        Self {
            draft,
            completed: None,
        }
    }

    pub fn from_wizard(wizard: &'a WizardController) -> Self {
        Self {
            draft: wizard.draft(),
            completed: wizard.completed(),
        }
    }
}

pub trait StepView {
    fn step(&self) -> Step;

    /// Describes the step's inputs and read-only rows for the current draft.
    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm;

    /// Converts one edit of the field `key` into a group replacement.
    fn edit(
        &mut self,
        draft: &ApplicationDraft,
        key: &str,
        value: &str,
    ) -> Result<DraftPatch, FormError>;

    /// Patch to apply when the step is shown, if it needs to seed anything.
    fn enter(
        &mut self,
        _draft: &ApplicationDraft,
    ) -> Option<DraftPatch> {
        None
    }

    /// Checks every rendered field; the step may be left only when this
    /// passes.
    fn validate(
        &self,
        draft: &ApplicationDraft,
    ) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .render(&StepContext::new(draft))
            .fields
            .iter()
            .filter_map(FormField::check)
            .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// One view per step.
#[derive(Debug, Default)]
pub struct StepViews {
    vehicle: VehicleView,
    personal: PersonalView,
    customization: CustomizationView,
    summary: SummaryView,
    payment: PaymentView,
    success: SuccessView,
}

impl StepViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        step: Step,
    ) -> &dyn StepView {
        match step {
            Step::Vehicle => &self.vehicle,
            Step::Personal => &self.personal,
            Step::Customization => &self.customization,
            Step::Summary => &self.summary,
            Step::Payment => &self.payment,
            Step::Success => &self.success,
        }
    }

    pub fn get_mut(
        &mut self,
        step: Step,
    ) -> &mut dyn StepView {
        match step {
            Step::Vehicle => &mut self.vehicle,
            Step::Personal => &mut self.personal,
            Step::Customization => &mut self.customization,
            Step::Summary => &mut self.summary,
            Step::Payment => &mut self.payment,
            Step::Success => &mut self.success,
        }
    }
}

/// Error for an edit to a key the step does not have.
pub(crate) fn unknown_field(
    step: Step,
    key: &str,
) -> FormError {
    FormError::UnknownField {
        step,
        key: key.to_string(),
    }
}
