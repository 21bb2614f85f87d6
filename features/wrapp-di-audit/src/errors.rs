use thiserror::Error;

use crate::service_id::ServiceId;

/// Problems found while auditing the registered services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A singleton constructor requires a service nobody registered
    #[error("'{consumer}' requires '{missing}' in its constructor but it is not registered")]
    UnresolvedDependency {
        consumer: ServiceId,
        missing: ServiceId,
    },
    /// A singleton constructor requires a scoped service, which would be captured for the whole process
    #[error("Singleton '{consumer}' depends on scoped service '{dependency}' - it would be captured beyond its scope")]
    LifetimeViolation {
        consumer: ServiceId,
        dependency: ServiceId,
    },
}

impl AuditError {
    /// The implementation whose constructor caused the problem
    pub fn consumer(&self) -> &ServiceId {
        match self {
            AuditError::UnresolvedDependency { consumer, .. }
            | AuditError::LifetimeViolation { consumer, .. } => consumer,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct AuditErrors {
    pub errors: Vec<AuditError>,
}
impl std::fmt::Display for AuditErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The service registrations had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

/// Errors when parsing the textual form of a [ServiceId]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseServiceIdError {
    #[error("Expected a service name at position {position}")]
    EmptyName { position: usize },
    #[error("Generic arguments of '{name}' are never closed")]
    UnclosedArguments { name: String },
    #[error("Unexpected '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("Generic arguments nest deeper than {limit} levels at position {position}")]
    TooDeep { limit: usize, position: usize },
    #[error("Unexpected input after the service name at position {position}")]
    TrailingInput { position: usize },
}
