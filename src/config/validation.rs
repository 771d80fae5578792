//! Configuration validation.
//!
//! Validates configuration before a client is built to catch common errors early.

use thiserror::Error;

use super::ClientConfig;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("connection.read_buffer_size must be greater than zero")]
    ZeroReadBuffer,
    #[error("connection.default_port must be greater than zero")]
    ZeroPort,
    #[error("connection.encoding is not a known encoding: '{0}'")]
    UnknownEncoding(String),
    #[error("events.max_listeners must be greater than zero")]
    ZeroMaxListeners,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.connection.read_buffer_size == 0 {
        errors.push(ValidationError::ZeroReadBuffer);
    }
    if config.connection.default_port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if slirc_proto::LineDecoder::new(&config.connection.encoding).is_err() {
        errors.push(ValidationError::UnknownEncoding(
            config.connection.encoding.clone(),
        ));
    }
    if config.events.max_listeners == 0 {
        errors.push(ValidationError::ZeroMaxListeners);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.connection.read_buffer_size = 0;
        config.connection.encoding = "klingon".into();
        config.events.max_listeners = 0;

        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::ZeroReadBuffer));
        assert!(matches!(errors[1], ValidationError::UnknownEncoding(ref e) if e == "klingon"));
        assert!(matches!(errors[2], ValidationError::ZeroMaxListeners));
    }
}
