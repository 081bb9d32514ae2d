// ABOUTME: Field validation command
// ABOUTME: Runs one of the input validators and prints the {valid, error, value} outcome

use clap::ValueEnum;
use reqflow_core::validation::{
    validate_comment, validate_name, validate_operational_flag, validate_platform,
    validate_priority, validate_review_status, validate_search_term, validate_title,
    validate_version_number,
};
use reqflow_core::ValidationOutcome;

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ValidateField {
    Title,
    Name,
    Description,
    Comment,
    Search,
    Version,
    Platform,
    Priority,
    ReviewStatus,
    OperationalFlag,
}

pub fn validate_field(field: ValidateField, value: &str) -> ValidationOutcome {
    let result = match field {
        ValidateField::Title => validate_title(value),
        ValidateField::Name => validate_name(value),
        ValidateField::Description => {
            reqflow_core::validation::validate_description(Some(value))
                .map(|v| v.unwrap_or_default())
        }
        ValidateField::Comment => validate_comment(value),
        ValidateField::Search => validate_search_term(value),
        ValidateField::Version => validate_version_number(value),
        ValidateField::Platform => validate_platform(value),
        ValidateField::Priority => validate_priority(value),
        ValidateField::ReviewStatus => validate_review_status(value),
        ValidateField::OperationalFlag => validate_operational_flag(value),
    };
    ValidationOutcome::from(result)
}

pub fn handle_validate_command(field: ValidateField, value: &str) -> anyhow::Result<()> {
    let outcome = validate_field(field, value);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.valid {
        Ok(())
    } else {
        anyhow::bail!(
            "{}",
            outcome.error.unwrap_or_else(|| "validation failed".to_string())
        )
    }
}
