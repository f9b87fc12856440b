use crate::error::AppError;

/// Rejects a missing or empty parameter before anything touches storage.
pub fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::required;

    #[test]
    fn test_required() {
        assert_eq!(required(Some("A".to_string()), "missing").unwrap(), "A");
        assert!(required(Some(String::new()), "missing").is_err());
        assert!(required(None, "missing").is_err());
    }

    #[test]
    fn test_required_keeps_whitespace() {
        assert_eq!(required(Some(" A ".to_string()), "missing").unwrap(), " A ");
    }
}
