//! The application draft accumulated across the wizard steps.
//!
//! The draft is only ever changed through [`DraftPatch`]: each step sends
//! whole field groups, and [`ApplicationDraft::merge`] replaces exactly the
//! groups that are present. Groups left out of a patch are never touched.

use serde::{Deserialize, Serialize};

use super::{ApplicantDetails, PaymentMethod, PolicyCustomization, VehicleDetails};
use crate::calculations::PremiumQuote;

/// Form state spanning every wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    /// Assigned the first time the customization step edits the draft.
    pub policy_number: Option<String>,
    pub vehicle: VehicleDetails,
    pub applicant: ApplicantDetails,
    pub policy: PolicyCustomization,
    /// Derived premium figures for the current policy group.
    pub quote: Option<PremiumQuote>,
    pub terms_accepted: bool,
    pub payment_method: Option<PaymentMethod>,
}

/// A partial update: `None` groups are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub policy_number: Option<String>,
    pub vehicle: Option<VehicleDetails>,
    pub applicant: Option<ApplicantDetails>,
    pub policy: Option<PolicyCustomization>,
    pub quote: Option<PremiumQuote>,
    pub terms_accepted: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

impl DraftPatch {
    pub fn vehicle(vehicle: VehicleDetails) -> Self {
        Self {
            vehicle: Some(vehicle),
            ..Default::default()
        }
    }

    pub fn applicant(applicant: ApplicantDetails) -> Self {
        Self {
            applicant: Some(applicant),
            ..Default::default()
        }
    }

    pub fn policy(policy: PolicyCustomization) -> Self {
        Self {
            policy: Some(policy),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the groups this patch replaces, for logging.
    pub fn group_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.policy_number.is_some() {
            names.push("policy_number");
        }
        if self.vehicle.is_some() {
            names.push("vehicle");
        }
        if self.applicant.is_some() {
            names.push("applicant");
        }
        if self.policy.is_some() {
            names.push("policy");
        }
        if self.quote.is_some() {
            names.push("quote");
        }
        if self.terms_accepted.is_some() {
            names.push("terms_accepted");
        }
        if self.payment_method.is_some() {
            names.push("payment_method");
        }
        names
    }
}

impl ApplicationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: every group present in `patch` replaces the current one.
    pub fn merge(
        &mut self,
        patch: DraftPatch,
    ) {
        let DraftPatch {
            policy_number,
            vehicle,
            applicant,
            policy,
            quote,
            terms_accepted,
            payment_method,
        } = patch;

        if let Some(policy_number) = policy_number {
            self.policy_number = Some(policy_number);
        }
        if let Some(vehicle) = vehicle {
            self.vehicle = vehicle;
        }
        if let Some(applicant) = applicant {
            self.applicant = applicant;
        }
        if let Some(policy) = policy {
            self.policy = policy;
        }
        if let Some(quote) = quote {
            self.quote = Some(quote);
        }
        if let Some(terms_accepted) = terms_accepted {
            self.terms_accepted = terms_accepted;
        }
        if let Some(payment_method) = payment_method {
            self.payment_method = Some(payment_method);
        }
    }

    /// Backend field names that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let v = &self.vehicle;
        let a = &self.applicant;

        if v.vehicle_type.is_none() {
            missing.push("vehicleType");
        }
        for (name, value) in [
            ("registrationNumber", &v.registration_number),
            ("make", &v.make),
            ("model", &v.model),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if v.year.is_none() {
            missing.push("year");
        }
        for (name, value) in [
            ("name", &a.name),
            ("mobile", &a.mobile),
            ("email", &a.email),
            ("address", &a.address),
            ("city", &a.city),
            ("state", &a.state),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if self.policy.idv.is_none() {
            missing.push("idv");
        }
        if self.policy.ncb.is_none() {
            missing.push("ncb");
        }
        if self.quote.is_none() {
            missing.push("policy_annual_premium");
        }
        missing
    }
}
