//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("database.url: must not be empty")]
    EmptyDatabaseUrl,

    #[error("database.url: unsupported scheme in {0:?}, expected mysql://")]
    UnsupportedDatabaseScheme(String),

    #[error("database.migrations_path: must not be empty when set")]
    EmptyMigrationsPath,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("server.address", &config.server.address, &mut errors);
    if config.server.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "server.max_connections",
        });
    }

    let url = config.database.url.trim();
    if url.is_empty() {
        errors.push(ValidationError::EmptyDatabaseUrl);
    } else if !url.starts_with("mysql://") {
        errors.push(ValidationError::UnsupportedDatabaseScheme(url.to_string()));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "database.max_connections",
        });
    }
    if config.database.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "database.connect_timeout_secs",
        });
    }
    if matches!(&config.database.migrations_path, Some(path) if path.trim().is_empty()) {
        errors.push(ValidationError::EmptyMigrationsPath);
    }

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&Config::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = Config::default();
        config.server.address = "localhost".into();
        config.server.max_connections = 0;
        config.database.url = "postgres://localhost/db".into();
        config.database.max_connections = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero {
            field: "server.max_connections"
        }));
        assert!(errors.contains(&ValidationError::UnsupportedDatabaseScheme(
            "postgres://localhost/db".into()
        )));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = Config::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidAddress { field: "observability.metrics_address", .. }]
        ));
    }

    #[test]
    fn empty_url_and_migrations_path() {
        let mut config = Config::default();
        config.database.url = "  ".into();
        config.database.migrations_path = Some(String::new());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyDatabaseUrl,
                ValidationError::EmptyMigrationsPath
            ]
        );
    }
}
