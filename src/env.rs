//! Environment variable validation and configuration module for logvault
//!
//! This module provides centralized validation and configuration management
//! for all environment variables used by the log store.
//!
//! # Supported Environment Variables
//!
//! ## Database Configuration
//! - `LOGVAULT_DB_URL`: Database connection URL (default: "sqlite://logvault.db")
//! - `LOGVAULT_COLLECTION`: Table that holds log entries (default: "logs")
//! - `LOGVAULT_MAX_CONNECTIONS`: Connection pool size (default: "10")
//!
//! ## Timeouts
//! - `LOGVAULT_CONNECT_TIMEOUT_MS`: Time allowed to open the store (default: "5000")
//! - `LOGVAULT_SOCKET_TIMEOUT_MS`: Time a single operation waits on a locked database (default: "5000")
//!
//! ## Query Configuration
//! - `LOGVAULT_KEYWORD_MATCH`: `pattern` keeps keywords as raw regex fragments,
//!   `literal` escapes them (default: "pattern")
//!
//! ## Logging Configuration
//! - `RUST_LOG`: Standard Rust logging configuration
//! - `LOGVAULT_LOG_LEVEL`: Application-specific log level override
//!
//! # Usage
//!
//! ```rust,no_run
//! use logvault::env::get_config;
//!
//! // Exits the process with a report if validation fails
//! let config = get_config();
//! println!("Storing logs in {} ({})", config.database_url, config.collection);
//! ```

use crate::database::{DEFAULT_COLLECTION, LOGVAULT_DB_URL, is_valid_collection_name};
use crate::query::KeywordMatch;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_LOG_LEVEL: &str = "logvault=info";

/// Environment validation errors
#[derive(Debug, Clone)]
pub struct EnvValidationError {
    pub variable: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Severity level for environment validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    /// Critical errors that prevent application startup
    Critical,
    /// Warnings about missing optional variables or suboptimal configurations
    Warning,
    /// Informational messages about default values being used
    Info,
}

/// Validated store configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // Database
    pub database_url: String,
    pub collection: String,
    pub max_connections: u32,

    // Timeouts
    pub connect_timeout_ms: u64,
    pub socket_timeout_ms: u64,

    // Query
    pub keyword_match: KeywordMatch,

    // Logging
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: LOGVAULT_DB_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            max_connections: 10,
            connect_timeout_ms: 5000,
            socket_timeout_ms: 5000,
            keyword_match: KeywordMatch::Pattern,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }
}

/// Validate all environment variables and return configuration or errors
pub fn validate_environment() -> Result<StoreConfig, Vec<EnvValidationError>> {
    let defaults = StoreConfig::default();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Database configuration
    let database_url = env::var("LOGVAULT_DB_URL").unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: "LOGVAULT_DB_URL".to_string(),
            message: format!("Using default database URL '{}'", defaults.database_url),
            severity: ErrorSeverity::Info,
        });
        defaults.database_url.clone()
    });

    if !database_url.starts_with("sqlite:") {
        errors.push(EnvValidationError {
            variable: "LOGVAULT_DB_URL".to_string(),
            message: format!("Unsupported database URL '{}', expected sqlite:", database_url),
            severity: ErrorSeverity::Critical,
        });
    }

    let collection = env::var("LOGVAULT_COLLECTION").unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: "LOGVAULT_COLLECTION".to_string(),
            message: format!("Using default collection '{}'", defaults.collection),
            severity: ErrorSeverity::Info,
        });
        defaults.collection.clone()
    });

    if !is_valid_collection_name(&collection) {
        errors.push(EnvValidationError {
            variable: "LOGVAULT_COLLECTION".to_string(),
            message: format!(
                "Invalid collection name '{}': use letters, digits and underscores",
                collection
            ),
            severity: ErrorSeverity::Critical,
        });
    }

    let max_connections = parse_env_var_with_default(
        "LOGVAULT_MAX_CONNECTIONS",
        defaults.max_connections,
        &mut warnings,
    );
    if max_connections == 0 {
        errors.push(EnvValidationError {
            variable: "LOGVAULT_MAX_CONNECTIONS".to_string(),
            message: "Connection pool size must be at least 1".to_string(),
            severity: ErrorSeverity::Critical,
        });
    }

    // Timeouts
    let connect_timeout_ms = parse_env_var_with_default(
        "LOGVAULT_CONNECT_TIMEOUT_MS",
        defaults.connect_timeout_ms,
        &mut warnings,
    );
    if connect_timeout_ms == 0 {
        errors.push(EnvValidationError {
            variable: "LOGVAULT_CONNECT_TIMEOUT_MS".to_string(),
            message: "Connect timeout must be at least 1ms".to_string(),
            severity: ErrorSeverity::Critical,
        });
    }
    let socket_timeout_ms = parse_env_var_with_default(
        "LOGVAULT_SOCKET_TIMEOUT_MS",
        defaults.socket_timeout_ms,
        &mut warnings,
    );

    // Query configuration
    let keyword_match =
        parse_env_var_with_default("LOGVAULT_KEYWORD_MATCH", defaults.keyword_match, &mut warnings);

    // Logging configuration
    let log_level = env::var("LOGVAULT_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| {
            warnings.push(EnvValidationError {
                variable: "RUST_LOG/LOGVAULT_LOG_LEVEL".to_string(),
                message: format!("Using default log level '{}'", DEFAULT_LOG_LEVEL),
                severity: ErrorSeverity::Info,
            });
            DEFAULT_LOG_LEVEL.to_string()
        });

    // Add all warnings to errors for reporting
    errors.extend(warnings);

    // Check if we have any critical errors
    let has_critical_errors = errors.iter().any(|e| e.severity == ErrorSeverity::Critical);

    if has_critical_errors {
        return Err(errors);
    }

    // Log non-critical issues
    for error in &errors {
        match error.severity {
            ErrorSeverity::Warning => warn!("{}: {}", error.variable, error.message),
            ErrorSeverity::Info => info!("{}: {}", error.variable, error.message),
            ErrorSeverity::Critical => {} // Already handled above
        }
    }

    Ok(StoreConfig {
        database_url,
        collection,
        max_connections,
        connect_timeout_ms,
        socket_timeout_ms,
        keyword_match,
        log_level,
    })
}

/// Get the validated configuration, exiting the process if validation fails
pub fn get_config() -> StoreConfig {
    match validate_environment() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("Environment validation failed:");
            for error in errors {
                match error.severity {
                    ErrorSeverity::Critical => {
                        eprintln!("CRITICAL - {}: {}", error.variable, error.message)
                    }
                    ErrorSeverity::Warning => {
                        eprintln!("WARNING - {}: {}", error.variable, error.message)
                    }
                    ErrorSeverity::Info => {
                        eprintln!("INFO - {}: {}", error.variable, error.message)
                    }
                }
            }
            std::process::exit(1);
        }
    }
}

/// Print environment validation results in a user-friendly format
pub fn print_validation_results(result: &Result<StoreConfig, Vec<EnvValidationError>>) {
    match result {
        Ok(config) => {
            println!("Environment validation successful");
            println!("Configuration:");
            println!("  Database URL: {}", config.database_url);
            println!("  Collection: {}", config.collection);
            println!("  Max Connections: {}", config.max_connections);
            println!("  Connect Timeout: {}ms", config.connect_timeout_ms);
            println!("  Socket Timeout: {}ms", config.socket_timeout_ms);
            println!("  Keyword Match: {}", config.keyword_match);
            println!("  Log Level: {}", config.log_level);
        }
        Err(errors) => {
            let critical_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Critical)
                .count();
            let warning_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Warning)
                .count();
            let info_count = errors
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Info)
                .count();

            eprintln!(
                "Environment validation failed with {} critical error(s), {} warning(s), {} info message(s):",
                critical_count, warning_count, info_count
            );

            for error in errors {
                let prefix = match error.severity {
                    ErrorSeverity::Critical => "CRITICAL",
                    ErrorSeverity::Warning => "WARNING",
                    ErrorSeverity::Info => "INFO",
                };
                eprintln!("  {} - {}: {}", prefix, error.variable, error.message);
            }
        }
    }
}

/// Generate example environment configuration file
pub fn generate_env_example() -> String {
    format!(
        r#"# logvault Environment Configuration
# Copy this file to .env and customize the values for your deployment

# =============================================================================
# Database Configuration
# =============================================================================

# Database connection URL
# Default: {db_url}
# Examples:
#   LOGVAULT_DB_URL=sqlite://logvault.db
#   LOGVAULT_DB_URL=sqlite:///var/lib/logvault/logvault.db
LOGVAULT_DB_URL={db_url}

# Table holding log entries (letters, digits and underscores)
# Default: {collection}
LOGVAULT_COLLECTION={collection}

# Connection pool size
# Default: 10
LOGVAULT_MAX_CONNECTIONS=10

# =============================================================================
# Timeouts
# =============================================================================

# Time allowed to open the database, in milliseconds
# Default: 5000
LOGVAULT_CONNECT_TIMEOUT_MS=5000

# Time a single operation waits on a locked database, in milliseconds
# Default: 5000
LOGVAULT_SOCKET_TIMEOUT_MS=5000

# =============================================================================
# Query Configuration
# =============================================================================

# Keyword matching mode
#   pattern - keywords are regex fragments ("a.c" also matches "abc")
#   literal - keywords are plain substrings
# Default: pattern
LOGVAULT_KEYWORD_MATCH=pattern

# =============================================================================
# Logging Configuration
# =============================================================================

# Log level configuration
# Default: {log_level}
# Examples:
#   RUST_LOG=debug                 # Everything at debug level
#   LOGVAULT_LOG_LEVEL=logvault=debug
RUST_LOG={log_level}
"#,
        db_url = LOGVAULT_DB_URL,
        collection = DEFAULT_COLLECTION,
        log_level = DEFAULT_LOG_LEVEL,
    )
}

/// Helper function to parse environment variable with default value
fn parse_env_var_with_default<T>(
    var_name: &str,
    default: T,
    warnings: &mut Vec<EnvValidationError>,
) -> T
where
    T: FromStr + Clone + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(var_name) {
        Ok(value_str) => match value_str.parse::<T>() {
            Ok(value) => value,
            Err(e) => {
                warnings.push(EnvValidationError {
                    variable: var_name.to_string(),
                    message: format!(
                        "Invalid value '{}': {}. Using default: {}",
                        value_str, e, default
                    ),
                    severity: ErrorSeverity::Warning,
                });
                default
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: var_name.to_string(),
                message: format!("Using default value: {}", default),
                severity: ErrorSeverity::Info,
            });
            default
        }
    }
}
