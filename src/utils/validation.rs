use validator::ValidationErrors;

/// Picks the first human-readable message out of a validation failure, for
/// flashing back at the form.
pub fn first_message(errors: &ValidationErrors) -> String {
    for (field, kind) in errors.field_errors() {
        if let Some(err) = kind.first() {
            return err
                .message
                .clone()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
        }
    }
    "Validation failed".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Too short"))]
        name: String,
    }

    #[test]
    fn surfaces_declared_message() {
        let probe = Probe {
            name: "ab".to_string(),
        };
        let errors = probe.validate().unwrap_err();
        assert_eq!(first_message(&errors), "Too short");
    }
}
