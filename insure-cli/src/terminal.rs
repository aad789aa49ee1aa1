//! Interactive rendering of the step views with `dialoguer`.

use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use insure_core::forms::{
    FieldError, FieldKind, FieldValue, FormField, StepContext, StepForm, StepViews,
};
use insure_core::wizard::CompletedSubmission;
use insure_core::{ApplicationGateway, Session, Step, WizardController};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Back,
    Quit,
}

/// The actions offered on `step`, with their menu labels.
fn actions(step: Step) -> Vec<(Action, &'static str)> {
    let next = match step {
        Step::Summary => "Submit application",
        Step::Payment => "Pay now",
        _ => "Next",
    };
    let mut actions = vec![(Action::Next, next)];
    if step != Step::FIRST {
        actions.push((Action::Back, "Back"));
    }
    actions.push((Action::Quit, "Quit"));
    actions
}

fn progress(step: Step) -> String {
    Step::all()
        .iter()
        .map(|s| {
            if *s == step {
                style(format!("[{}]", s.number())).cyan().bold().to_string()
            } else if *s < step {
                style(s.number().to_string()).green().to_string()
            } else {
                style(s.number().to_string()).dim().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ─ ")
}

fn print_form(
    form: &StepForm,
    error: Option<&str>,
) {
    println!();
    println!("  {}", progress(form.step));
    println!();
    println!(
        "  {}",
        style(format!("Step {}: {}", form.step.number(), form.step.title()))
            .bold()
            .underlined()
    );

    for section in &form.sections {
        println!();
        println!("  {}", style(section.heading).bold());
        for row in &section.rows {
            println!("    {:<26} {}", style(&row.label).dim(), row.value);
        }
    }

    if let Some(error) = error {
        println!();
        println!("  {} {}", style("✗").red(), style(error).red());
    }
    println!();
}

fn print_field_errors(errors: &[FieldError]) {
    println!();
    for error in errors {
        println!("  {} {}", style("✗").red(), style(error).red());
    }
}

/// Applies one edit through the current step's view. A rejected edit is
/// shown and leaves the draft as it was.
fn apply_edit(
    views: &mut StepViews,
    wizard: &mut WizardController,
    key: &'static str,
    value: &str,
) -> bool {
    let step = wizard.step();
    match views.get_mut(step).edit(wizard.draft(), key, value) {
        Ok(patch) => {
            wizard.merge(patch);
            true
        }
        Err(e) => {
            debug!(%step, key, error = %e, "edit rejected");
            println!("  {} {}", style("✗").red(), style(e).red());
            false
        }
    }
}

/// Prompts for one field. Typed input is asked for again until the view
/// accepts it; a rejected choice keeps the previous value.
fn prompt_field(
    theme: &ColorfulTheme,
    views: &mut StepViews,
    wizard: &mut WizardController,
    field: &FormField,
) -> Result<()> {
    let prompt = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };

    match (&field.kind, &field.value) {
        (FieldKind::Select(options), FieldValue::Text(current)) => {
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            let default = options.iter().position(|o| o.value == *current).unwrap_or(0);
            let index = Select::with_theme(theme)
                .with_prompt(prompt)
                .items(&labels)
                .default(default)
                .interact()?;
            apply_edit(views, wizard, field.key, &options[index].value);
        }
        (FieldKind::MultiSelect(options), FieldValue::Selected(current)) => {
            let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
            let before: Vec<bool> = options.iter().map(|o| current.contains(&o.value)).collect();
            let chosen = MultiSelect::with_theme(theme)
                .with_prompt(format!("{prompt} (space to toggle)"))
                .items(&labels)
                .defaults(&before)
                .interact()?;
            for (i, option) in options.iter().enumerate() {
                if before[i] != chosen.contains(&i) {
                    apply_edit(views, wizard, field.key, &option.value);
                }
            }
        }
        (FieldKind::Checkbox, FieldValue::Checked(current)) => {
            let checked = Confirm::with_theme(theme)
                .with_prompt(prompt)
                .default(*current)
                .interact()?;
            apply_edit(views, wizard, field.key, if checked { "true" } else { "false" });
        }
        (_, value) => loop {
            let text: String = Input::with_theme(theme)
                .with_prompt(&prompt)
                .with_initial_text(value.as_text())
                .allow_empty(true)
                .interact_text()?;
            if apply_edit(views, wizard, field.key, &text) {
                break;
            }
        },
    }
    Ok(())
}

fn choose_action(
    theme: &ColorfulTheme,
    step: Step,
) -> Result<Action> {
    let actions = actions(step);
    let labels: Vec<&str> = actions.iter().map(|(_, label)| *label).collect();
    let index = Select::with_theme(theme)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(actions[index].0)
}

/// What choosing Next did.
#[derive(Debug, PartialEq, Eq)]
enum NextOutcome {
    /// The step's own checks failed and the controller was not asked to move.
    Blocked(Vec<FieldError>),
    Moved(Step),
    /// The controller refused to move; its error is shown on the next render.
    Stayed,
}

/// Handles Next: the step must pass its field checks before the controller
/// advances, so an incomplete Summary never reaches the gateway.
async fn go_next(
    views: &StepViews,
    wizard: &mut WizardController,
    gateway: &dyn ApplicationGateway,
    session: &Session,
) -> NextOutcome {
    if let Err(errors) = views.get(wizard.step()).validate(wizard.draft()) {
        return NextOutcome::Blocked(errors);
    }
    match wizard.advance(gateway, session).await {
        Ok(step) => NextOutcome::Moved(step),
        Err(e) => {
            debug!(error = %e, "advance refused");
            NextOutcome::Stayed
        }
    }
}

/// Runs the application wizard until it reaches Success or the user quits.
/// Returns the receipt when the application was accepted.
pub async fn run_wizard(
    gateway: &dyn ApplicationGateway,
    session: &Session,
) -> Result<Option<CompletedSubmission>> {
    let term = Term::stdout();
    let theme = ColorfulTheme::default();
    let mut wizard = WizardController::new();
    let mut views = StepViews::new();

    term.clear_screen()?;
    println!("  {}", style("Motor Insurance Application").cyan().bold());

    loop {
        let step = wizard.step();
        if let Some(patch) = views.get_mut(step).enter(wizard.draft()) {
            wizard.merge(patch);
        }
        let form = views.get(step).render(&StepContext::from_wizard(&wizard));
        print_form(&form, wizard.error());

        if step == Step::LAST {
            println!("  {} Application submitted", style("✓").green());
            return Ok(wizard.completed().cloned());
        }

        for field in &form.fields {
            prompt_field(&theme, &mut views, &mut wizard, field)?;
        }

        match choose_action(&theme, step)? {
            Action::Next => {
                if step == Step::SUBMIT {
                    println!("  {} Submitting application...", style("→").cyan());
                }
                if let NextOutcome::Blocked(errors) =
                    go_next(&views, &mut wizard, gateway, session).await
                {
                    print_field_errors(&errors);
                }
            }
            Action::Back => {
                wizard.retreat();
            }
            Action::Quit => {
                println!("  {} Cancelled", style("✗").red());
                return Ok(None);
            }
        }
    }
}
