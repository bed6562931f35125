//! Bridge from `validator` derive errors into [`ValidationErrors`].
//!
//! Query-parameter structs use `#[derive(validator::Validate)]` for simple
//! range checks. Their errors are keyed by Rust field name; the wire uses
//! camelCase, so keys are converted on the way through.

use super::rules::ValidationErrors;

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = source.field_errors().into_iter().collect();
        // `field_errors` is a HashMap; sort for a stable response body.
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut errors = ValidationErrors::new();
        for (field, field_errors) in fields {
            let wire_name = to_camel_case(&field);
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{wire_name} is invalid"));
                errors.push(wire_name.clone(), message);
            }
        }
        errors
    }
}

/// `page_size` -> `pageSize`.
pub fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
