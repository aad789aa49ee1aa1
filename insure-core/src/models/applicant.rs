use serde::{Deserialize, Serialize};

/// Field group owned by the personal information step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDetails {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
}
