mod applicant;
mod document;
mod draft;
mod payment;
mod policy;
mod vehicle;

pub use applicant::ApplicantDetails;
pub use document::{DocumentKind, DocumentScore, DocumentUpload};
pub use draft::{ApplicationDraft, DraftPatch};
pub use payment::PaymentMethod;
pub use policy::{AddOn, NoClaimBonus, PolicyCustomization};
pub use vehicle::{VehicleDetails, VehicleType};
