use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AddOn, ApplicationDraft};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Missing required field(s): {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: Decimal },
}

/// Body of `POST /apply/new`, using the backend's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(rename = "vehicleType")]
    pub vehicle_type: String,
    #[serde(rename = "registrationNumber")]
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub idv: String,
    pub ncb: String,
    pub addons: Vec<AddOn>,
    pub policy_annual_premium: i64,
    pub umbrella_limit: i64,
    pub policy_csl: i64,
    pub total_insurance_amount: i64,
}

impl TryFrom<&ApplicationDraft> for ApplicationPayload {
    type Error = PayloadError;

    fn try_from(draft: &ApplicationDraft) -> Result<Self, Self::Error> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(PayloadError::Incomplete(missing));
        }

        // missing_fields() has ruled these out.
        let (Some(vehicle_type), Some(year), Some(idv), Some(ncb), Some(quote)) = (
            draft.vehicle.vehicle_type,
            draft.vehicle.year,
            draft.policy.idv,
            draft.policy.ncb,
            draft.quote.as_ref(),
        ) else {
            return Err(PayloadError::Incomplete(draft.missing_fields()));
        };

        let v = &draft.vehicle;
        let a = &draft.applicant;
        let coverage = &quote.coverage;

        Ok(Self {
            policy_number: draft.policy_number.clone(),
            vehicle_type: vehicle_type.as_str().to_string(),
            registration_number: v.registration_number.trim().to_string(),
            make: v.make.trim().to_string(),
            model: v.model.trim().to_string(),
            year: year.to_string(),
            name: a.name.trim().to_string(),
            mobile: a.mobile.trim().to_string(),
            email: a.email.trim().to_string(),
            address: a.address.trim().to_string(),
            city: a.city.trim().to_string(),
            state: a.state.trim().to_string(),
            idv: idv.normalize().to_string(),
            ncb: ncb.percent().to_string(),
            addons: draft.policy.addons.clone(),
            policy_annual_premium: whole_rupees("policy_annual_premium", coverage.policy_annual_premium)?,
            umbrella_limit: whole_rupees("umbrella_limit", coverage.umbrella_limit)?,
            policy_csl: whole_rupees("policy_csl", coverage.policy_csl)?,
            total_insurance_amount: whole_rupees(
                "total_insurance_amount",
                coverage.total_insurance_amount,
            )?,
        })
    }
}

fn whole_rupees(
    field: &'static str,
    value: Decimal,
) -> Result<i64, PayloadError> {
    value
        .round()
        .to_i64()
        .ok_or(PayloadError::OutOfRange { field, value })
}

/// Body of a successful `POST /apply/new` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub application_id: String,
    #[serde(default)]
    pub message: String,
}
