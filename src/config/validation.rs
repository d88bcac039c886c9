//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every pattern strictly so malformed routes surface here
//!   instead of silently never matching
//! - Check redirect targets and the history root
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterFile → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::{Action, ConfigOptions, RouteSpec, RouterFile};
use crate::pattern::{compile_strict, PatternError};

/// A single semantic problem in a route file.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("route '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("route '{0}': redirect target is empty")]
    EmptyRedirect(String),

    #[error("route '{0}': a default route needs an alias to own nested routes")]
    UnaddressableChildren(String),

    #[error("root '{0}' must not contain '?' or '#'")]
    InvalidRoot(String),
}

/// Validate a parsed route file.
pub fn validate_config(file: &RouterFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_options(&file.router, &mut errors);
    for route in &file.routes {
        check_route(route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_options(options: &ConfigOptions, errors: &mut Vec<ValidationError>) {
    if let Some(root) = &options.root {
        if root.contains(['?', '#']) {
            errors.push(ValidationError::InvalidRoot(root.clone()));
        }
    }
}

fn check_route(route: &RouteSpec, errors: &mut Vec<ValidationError>) {
    if let Some(pattern) = &route.pattern {
        if let Err(source) = compile_strict(pattern) {
            errors.push(ValidationError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            });
        }
    } else if route.alias.is_none() && !route.children.is_empty() {
        errors.push(ValidationError::UnaddressableChildren(route.label().to_string()));
    }

    if let Action::Redirect(target) = &route.action {
        if target.trim().is_empty() {
            errors.push(ValidationError::EmptyRedirect(route.label().to_string()));
        }
    }

    if let Some(options) = &route.config {
        check_options(options, errors);
    }
    for child in &route.children {
        check_route(child, errors);
    }
}
