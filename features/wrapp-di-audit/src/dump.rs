use crate::{options::AuditOptions, types::Registration};

/// Lists all registered services, one `"{service} - {lifetime}"` line each
///
/// Lines are sorted by lifetime name first, then service name, both compared ordinally.
/// The result only depends on what is registered, not on the registration order.
pub fn dump(registrations: &[Registration]) -> String {
    dump_with(registrations, &AuditOptions::default())
}

/// [dump()] with custom options
pub fn dump_with(registrations: &[Registration], options: &AuditOptions) -> String {
    let mut entries: Vec<(&'static str, String)> = registrations
        .iter()
        .map(|registration| (registration.lifetime.as_str(), registration.service.full_name()))
        .collect();

    // Tuple ordering compares lifetime first, str ordering is byte-wise
    entries.sort();

    entries
        .iter()
        .map(|(lifetime, service)| format!("{service} - {lifetime}"))
        .collect::<Vec<_>>()
        .join(&*options.line_terminator)
}
