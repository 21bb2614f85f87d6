//! Wrapp DI Audit inspects the registrations of a DI container before anything is constructed.
//!
//! It offers two diagnostics:
//! 1. [dump()]: a sorted listing of every registered service and its lifetime
//! 2. [assert_dependency_valid]: fails if a singleton's constructor depends on a scoped service,
//!    or on a service nobody registered
//!
//! Implementations declare their constructors through [Component] (or [Implementation] directly),
//! so the audit works on a static dependency graph.
//!
//! # Examples
//!
//! ```rust
//! use wrapp_di_audit::{AuditError, Component, Constructor, Lifetime, ServiceId, ServiceRegistry};
//!
//! struct RequestContext;
//! struct ReportService;
//!
//! impl Component for ReportService {
//!     fn constructors() -> Vec<Constructor> {
//!         vec![Constructor::new([ServiceId::of::<RequestContext>()])]
//!     }
//! }
//!
//! let registry = ServiceRegistry::new()
//!     .add_singleton::<ReportService, ReportService>()
//!     .add_factory::<RequestContext>(Lifetime::Scoped);
//!
//! println!("{}", registry.dump());
//!
//! match registry.assert_dependency_valid() {
//!     Err(AuditError::LifetimeViolation { consumer, dependency }) => {
//!         assert_eq!(consumer, ServiceId::of::<ReportService>());
//!         assert_eq!(dependency, ServiceId::of::<RequestContext>());
//!     }
//!     other => panic!("expected a lifetime violation, got {other:?}"),
//! }
//! ```

pub mod dump;
pub mod errors;
pub mod lifetime_check;
pub mod options;
pub mod registry;
pub mod service_id;
pub mod types;

pub use dump::{dump, dump_with};
pub use errors::{AuditError, AuditErrors, ParseServiceIdError};
pub use lifetime_check::{assert_dependency_valid, LifetimeAudit};
pub use options::{AuditOptions, ConstructorPolicy};
pub use registry::ServiceRegistry;
pub use service_id::{ServiceId, TypeArg};
pub use types::{Component, Constructor, Implementation, Lifetime, Registration};
