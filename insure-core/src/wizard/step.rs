use std::fmt;

use serde::{Deserialize, Serialize};

/// The six wizard steps, numbered 1 through 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    Vehicle = 1,
    Personal = 2,
    Customization = 3,
    Summary = 4,
    Payment = 5,
    Success = 6,
}

impl Step {
    pub const FIRST: Step = Step::Vehicle;
    pub const LAST: Step = Step::Success;
    /// Leaving this step sends the application to the backend.
    pub const SUBMIT: Step = Step::Summary;

    pub fn all() -> &'static [Step] {
        &[
            Step::Vehicle,
            Step::Personal,
            Step::Customization,
            Step::Summary,
            Step::Payment,
            Step::Success,
        ]
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::all().iter().copied().find(|step| step.number() == number)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle Details",
            Self::Personal => "Personal Info",
            Self::Customization => "Customize Policy",
            Self::Summary => "Summary",
            Self::Payment => "Payment",
            Self::Success => "Success",
        }
    }

    /// The following step, or `self` on the last step.
    pub fn next(&self) -> Step {
        Self::from_number(self.number() + 1).unwrap_or(Self::LAST)
    }

    /// The preceding step, or `self` on the first step.
    pub fn previous(&self) -> Step {
        self.number()
            .checked_sub(1)
            .and_then(Self::from_number)
            .unwrap_or(Self::FIRST)
    }
}

impl fmt::Display for Step {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}
