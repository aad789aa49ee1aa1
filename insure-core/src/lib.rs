pub mod calculations;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod wizard;

pub use gateway::{ApplicationGateway, DocumentGateway, GatewayError, Session};
pub use models::*;
pub use wizard::{Step, WizardController, WizardError};
