use chrono::Datelike;

use super::{
    Choice, FieldKind, FieldValue, FormError, FormField, StepContext, StepForm, StepView,
    unknown_field,
};
use crate::models::{ApplicationDraft, DraftPatch, VehicleType};
use crate::wizard::Step;

/// Oldest year of manufacture accepted.
pub const MIN_YEAR: i32 = 2000;

#[derive(Debug, Clone)]
pub struct VehicleView {
    max_year: i32,
}

impl Default for VehicleView {
    fn default() -> Self {
        Self::with_max_year(chrono::Local::now().year())
    }
}

impl VehicleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the year of manufacture at `max_year` instead of the current year.
    pub fn with_max_year(max_year: i32) -> Self {
        Self { max_year }
    }
}

impl StepView for VehicleView {
    fn step(&self) -> Step {
        Step::Vehicle
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let vehicle = &ctx.draft.vehicle;
        let types = VehicleType::all()
            .iter()
            .map(|t| Choice::new(t.as_str(), t.label()))
            .collect();

        StepForm::new(Step::Vehicle)
            .field(
                FormField::new(
                    "vehicleType",
                    "Vehicle Type",
                    FieldKind::Select(types),
                    FieldValue::Text(
                        vehicle.vehicle_type.map(|t| t.as_str()).unwrap_or_default().to_string(),
                    ),
                )
                .required(),
            )
            .field(
                FormField::text(
                    "registrationNumber",
                    "Registration Number",
                    &vehicle.registration_number,
                )
                .required(),
            )
            .field(FormField::text("make", "Make", &vehicle.make).required())
            .field(FormField::text("model", "Model", &vehicle.model).required())
            .field(
                FormField::text(
                    "year",
                    "Year of Manufacture",
                    vehicle.year.map(|y| y.to_string()).unwrap_or_default(),
                )
                .with_kind(FieldKind::Number {
                    min: i64::from(MIN_YEAR),
                    max: i64::from(self.max_year),
                })
                .required(),
            )
    }

    fn edit(
        &mut self,
        draft: &ApplicationDraft,
        key: &str,
        value: &str,
    ) -> Result<DraftPatch, FormError> {
        let mut vehicle = draft.vehicle.clone();
        let trimmed = value.trim();

        match key {
            "vehicleType" if trimmed.is_empty() => vehicle.vehicle_type = None,
            "vehicleType" => {
                vehicle.vehicle_type =
                    Some(VehicleType::parse(trimmed).ok_or_else(|| FormError::InvalidChoice {
                        label: "Vehicle Type",
                        value: value.to_string(),
                    })?);
            }
            "registrationNumber" => vehicle.registration_number = value.to_string(),
            "make" => vehicle.make = value.to_string(),
            "model" => vehicle.model = value.to_string(),
            "year" if trimmed.is_empty() => vehicle.year = None,
            // Range is left to validate(), like a native number input.
            "year" => {
                vehicle.year = Some(trimmed.parse().map_err(|_| FormError::InvalidNumber {
                    label: "Year of Manufacture",
                    value: value.to_string(),
                })?);
            }
            _ => return Err(unknown_field(Step::Vehicle, key)),
        }

        Ok(DraftPatch::vehicle(vehicle))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn apply(
        view: &mut VehicleView,
        draft: &mut ApplicationDraft,
        key: &str,
        value: &str,
    ) {
        let patch = view.edit(draft, key, value).unwrap();
        draft.merge(patch);
    }

    #[test]
    fn empty_draft_fails_every_required_field() {
        let view = VehicleView::with_max_year(2025);

        let errors = view.validate(&ApplicationDraft::new()).unwrap_err();

        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Vehicle Type is required",
                "Registration Number is required",
                "Make is required",
                "Model is required",
                "Year of Manufacture is required",
            ]
        );
    }

    #[test]
    fn edits_replace_the_vehicle_group_only() {
        let mut view = VehicleView::with_max_year(2025);
        let mut draft = ApplicationDraft::new();
        draft.applicant.name = "Asha Rao".to_string();

        apply(&mut view, &mut draft, "vehicleType", "twoWheeler");
        apply(&mut view, &mut draft, "registrationNumber", "DL3CAB0001");
        apply(&mut view, &mut draft, "make", "Honda");
        apply(&mut view, &mut draft, "model", "Activa");
        apply(&mut view, &mut draft, "year", "2019");

        assert_eq!(draft.vehicle.vehicle_type, Some(VehicleType::TwoWheeler));
        assert_eq!(draft.vehicle.make_and_model(), "Honda Activa");
        assert_eq!(draft.vehicle.year, Some(2019));
        assert_eq!(draft.applicant.name, "Asha Rao");
        assert_eq!(view.validate(&draft), Ok(()));
    }

    #[test]
    fn patch_carries_only_the_vehicle_group() {
        let mut view = VehicleView::with_max_year(2025);

        let patch = view.edit(&ApplicationDraft::new(), "make", "Tata").unwrap();

        assert_eq!(patch.group_names(), vec!["vehicle"]);
    }

    #[test]
    fn year_outside_range_fails_validation() {
        let mut view = VehicleView::with_max_year(2025);
        let mut draft = ApplicationDraft::new();
        apply(&mut view, &mut draft, "year", "1998");

        let errors = view.validate(&draft).unwrap_err();

        assert!(
            errors
                .iter()
                .any(|e| e.key == "year" && e.message == "Year of Manufacture must be between 2000 and 2025")
        );
    }

    #[test]
    fn future_year_fails_validation() {
        let mut view = VehicleView::with_max_year(2025);
        let mut draft = ApplicationDraft::new();
        apply(&mut view, &mut draft, "year", "2026");

        let errors = view.validate(&draft).unwrap_err();

        assert!(errors.iter().any(|e| e.key == "year"));
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let mut view = VehicleView::with_max_year(2025);

        let result = view.edit(&ApplicationDraft::new(), "year", "twenty");

        assert_eq!(
            result,
            Err(FormError::InvalidNumber {
                label: "Year of Manufacture",
                value: "twenty".to_string(),
            })
        );
    }

    #[test]
    fn unknown_vehicle_type_is_rejected() {
        let mut view = VehicleView::with_max_year(2025);

        let result = view.edit(&ApplicationDraft::new(), "vehicleType", "truck");

        assert!(matches!(result, Err(FormError::InvalidChoice { .. })));
    }

    #[test]
    fn clearing_year_sets_none() {
        let mut view = VehicleView::with_max_year(2025);
        let mut draft = ApplicationDraft::new();
        apply(&mut view, &mut draft, "year", "2020");
        apply(&mut view, &mut draft, "year", "");

        assert_eq!(draft.vehicle.year, None);
    }

    #[test]
    fn render_shows_current_values() {
        let view = VehicleView::with_max_year(2025);
        let mut draft = ApplicationDraft::new();
        draft.vehicle.vehicle_type = Some(VehicleType::Suv);
        draft.vehicle.year = Some(2022);

        let form = view.render(&StepContext::new(&draft));

        assert_eq!(form.find("vehicleType").unwrap().value.as_text(), "suv");
        assert_eq!(form.find("year").unwrap().value.as_text(), "2022");
        assert_eq!(form.fields.len(), 5);
    }
}
