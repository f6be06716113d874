use crate::catalog::model::{CocktailInput, SearchFilters, ValidatedCocktail};
use crate::catalog::text;
use crate::error::ValidationError;

pub const NAME_MAX_CHARS: usize = 30;
pub const COLOR_MAX_CHARS: usize = 10;
pub const PROCESSES_MAX_CHARS: usize = 250;
pub const IMAGE_MAX_BYTES: i64 = 10_485_760;

const ALLOWED_IMAGE_MIMES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Checks a search submission. Empty result means the filters are usable.
pub fn validate_search(filters: &SearchFilters) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let has_other_field = is_provided(&filters.glass) || is_provided(&filters.taste);
    let name_is_empty = filters
        .name
        .as_deref()
        .map(text::folded_is_empty)
        .unwrap_or(true);

    if name_is_empty && !has_other_field {
        errors.push(ValidationError::EmptyQuery);
        return errors;
    }

    if let Some(name) = filters.name.as_deref() {
        if name.trim().chars().count() > NAME_MAX_CHARS {
            errors.push(ValidationError::NameTooLong);
        }
    }

    errors
}

/// Checks a create/edit submission, collecting every applicable error in one
/// pass. On success the required fields come back no longer optional.
pub fn validate_cocktail(input: &CocktailInput) -> Result<ValidatedCocktail, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = provided(&input.name);
    let glass = provided(&input.glass);
    let taste = provided(&input.taste);

    if name.is_none() {
        errors.push(ValidationError::MissingField("name"));
    } else if let Some(value) = input.name.as_deref() {
        if value.chars().count() > NAME_MAX_CHARS {
            errors.push(ValidationError::NameTooLong);
        }
    }

    if glass.is_none() {
        errors.push(ValidationError::MissingField("glass"));
    }
    if input.percentage.is_none() {
        errors.push(ValidationError::MissingField("percentage"));
    }

    if let Some(color) = input.color.as_deref() {
        if color.chars().count() > COLOR_MAX_CHARS {
            errors.push(ValidationError::ColorTooLong);
        }
    }

    if taste.is_none() {
        errors.push(ValidationError::MissingField("taste"));
    }

    if let Some(processes) = input.processes.as_deref() {
        if processes.chars().count() > PROCESSES_MAX_CHARS {
            errors.push(ValidationError::ProcessesTooLong);
        }
    }

    if let Some(image) = &input.image {
        if !ALLOWED_IMAGE_MIMES.contains(&image.mime.as_str()) {
            errors.push(ValidationError::UnsupportedImageType);
        }
        if image.size >= IMAGE_MAX_BYTES {
            errors.push(ValidationError::ImageTooLarge);
        }
    }

    if input.ingredients.is_empty() {
        errors.push(ValidationError::MissingField("ingredients"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    match (name, glass, input.percentage, taste) {
        (Some(name), Some(glass), Some(percentage), Some(taste)) => Ok(ValidatedCocktail {
            id: input.id,
            name,
            glass,
            percentage,
            color: input.color.clone(),
            taste,
            processes: input.processes.clone(),
            ingredients: input.ingredients.clone(),
            tag_ids: input.tag_ids.clone(),
            image: input.image.clone(),
        }),
        // Unreachable: a missing required field always pushed an error above.
        _ => Err(errors),
    }
}

fn is_provided(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn provided(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.trim().is_empty()).map(str::to_string)
}
