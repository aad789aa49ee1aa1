use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "suv")]
    Suv,
    #[serde(rename = "commercial")]
    Commercial,
    #[serde(rename = "twoWheeler")]
    TwoWheeler,
}

impl VehicleType {
    pub fn all() -> &'static [VehicleType] {
        &[
            VehicleType::Car,
            VehicleType::Suv,
            VehicleType::Commercial,
            VehicleType::TwoWheeler,
        ]
    }

    /// Wire code sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Suv => "suv",
            Self::Commercial => "commercial",
            Self::TwoWheeler => "twoWheeler",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Suv => "SUV",
            Self::Commercial => "Commercial Vehicle",
            Self::TwoWheeler => "Two-Wheeler",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "car" => Some(Self::Car),
            "suv" => Some(Self::Suv),
            "commercial" => Some(Self::Commercial),
            "twoWheeler" => Some(Self::TwoWheeler),
            _ => None,
        }
    }
}

/// Field group owned by the vehicle details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub vehicle_type: Option<VehicleType>,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    /// Year of manufacture.
    pub year: Option<i32>,
}

impl VehicleDetails {
    /// "Make Model", trimmed when either half is blank.
    pub fn make_and_model(&self) -> String {
        format!("{} {}", self.make, self.model).trim().to_string()
    }
}
