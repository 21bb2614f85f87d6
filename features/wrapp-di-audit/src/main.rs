use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use wrapp_di_audit::{
    AuditOptions, Component, Constructor, Registration, ServiceId, ServiceRegistry, TypeArg,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = sample_registry();
    tracing::info!("Registered services:\n{}", registry.dump());

    let options = AuditOptions::default();
    match registry.audit(&options).check_all() {
        Ok(()) => {
            tracing::info!("All singleton dependencies are valid");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            tracing::error!("{errors}");
            ExitCode::FAILURE
        }
    }
}

/// A request scoped report service on top of singleton infrastructure
fn sample_registry() -> ServiceRegistry {
    ServiceRegistry::new()
        .add_instance::<Clock>()
        .add_singleton::<dyn Cache, MemoryCache>()
        .add_scoped::<ReportService, ReportService>()
        .add_scoped::<RequestContext, RequestContext>()
        .add(Registration::transient(ServiceId::generic(
            "Logger",
            [TypeArg::param("T")],
        )))
}

struct Clock;

trait Cache {}
struct MemoryCache;
impl Component for MemoryCache {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new([ServiceId::of::<Clock>()])]
    }
}

struct RequestContext;
impl Component for RequestContext {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::default()]
    }
}

struct ReportService;
impl Component for ReportService {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new([
            ServiceId::of::<dyn Cache>(),
            ServiceId::generic("Logger", [ServiceId::of::<ReportService>()]),
            ServiceId::of::<RequestContext>(),
        ])]
    }
}
