use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password, Select};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default_value) = default {
        input = input.default(default_value.to_string());
    }
    input.interact_text().map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt for a non-empty string, asking again on blank input
pub fn prompt_required(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map(|s| s.trim().to_string())
        .map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Prompt for a password (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Pick one entry; `None` when the user backs out with Esc
pub fn prompt_select<T: ToString>(prompt: &str, items: &[T]) -> Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| eyre!("Failed to read selection: {}", e))
}

/// Prompt for a 1-based position no larger than `max`
pub fn prompt_position(prompt: &str, max: usize) -> Result<usize> {
    Input::<usize>::new()
        .with_prompt(format!("{} (1-{})", prompt, max))
        .validate_with(move |n: &usize| -> Result<(), String> {
            if *n >= 1 && *n <= max {
                Ok(())
            } else {
                Err(format!("Enter a number between 1 and {}", max))
            }
        })
        .interact_text()
        .map_err(|e| eyre!("Failed to read position: {}", e))
}
