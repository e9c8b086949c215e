use crate::config::ComposerConfig;
use crate::model::{
    Action, ActionType, Element, ElementType, Executor, SUBMIT_BUTTON_TYPE, Variant,
};
use serde_json::Value;

/// Normalizes the components of a single step.
///
/// - Only the first form of a step is kept.
/// - Primary buttons inside a form become submit buttons.
/// - A form with exactly one submit button gets an executor inferred from its inputs:
///   the password executor when it holds a password input, otherwise the OTP executor
///   when it holds an OTP input.
pub fn mutate_components(components: Vec<Element>, config: &ComposerConfig) -> Vec<Element> {
    let mut seen_form = false;
    components
        .into_iter()
        .filter(|component| {
            if !component.is_form() {
                return true;
            }
            !std::mem::replace(&mut seen_form, true)
        })
        .map(|component| {
            if component.is_form() {
                normalize_form(component, config)
            } else {
                component
            }
        })
        .collect()
}

fn normalize_form(mut form: Element, config: &ComposerConfig) -> Element {
    for child in &mut form.components {
        if child.is_button() && child.has_variant(&Variant::Primary) {
            child.set_config_value("type", Value::from(SUBMIT_BUTTON_TYPE));
        }
    }

    let has_input = |variant: Variant| {
        form.components
            .iter()
            .any(|c| c.kind == ElementType::Input && c.has_variant(&variant))
    };
    let executor = if has_input(Variant::Password) {
        Some(config.password_executor.clone())
    } else if has_input(Variant::Otp) {
        Some(config.otp_executor.clone())
    } else {
        None
    };

    let submit_count = form
        .components
        .iter()
        .filter(|c| c.is_submit_button())
        .count();

    if let (Some(executor), 1) = (executor, submit_count)
        && let Some(button) = form.components.iter_mut().find(|c| c.is_submit_button())
    {
        let mut action: Action = button.action.take().unwrap_or_default();
        action.kind = Some(ActionType::Executor);
        action.executor = Some(Executor::named(executor));
        button.action = Some(action);
    }

    form
}
