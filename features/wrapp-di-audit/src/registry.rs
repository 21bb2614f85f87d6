use crate::{
    dump::dump_with,
    errors::AuditError,
    lifetime_check::LifetimeAudit,
    options::AuditOptions,
    service_id::ServiceId,
    types::{Component, Lifetime, Registration},
};

/// Ordered list of service registrations - the container configuration to audit
///
/// Registering a service twice is allowed, e.g. for collection injection.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    registrations: Vec<Registration>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        ServiceRegistry {
            registrations: Vec::new(),
        }
    }
}

impl ServiceRegistry {
    pub fn add(mut self, registration: Registration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn add_singleton<Service: ?Sized + 'static, Impl: Component>(self) -> Self {
        self.add(Registration::of::<Service, Impl>(Lifetime::Singleton))
    }

    pub fn add_scoped<Service: ?Sized + 'static, Impl: Component>(self) -> Self {
        self.add(Registration::of::<Service, Impl>(Lifetime::Scoped))
    }

    pub fn add_transient<Service: ?Sized + 'static, Impl: Component>(self) -> Self {
        self.add(Registration::of::<Service, Impl>(Lifetime::Transient))
    }

    /// Registers an already created instance - always a singleton
    pub fn add_instance<Service: ?Sized + 'static>(self) -> Self {
        self.add(Registration::singleton(ServiceId::of::<Service>()))
    }

    /// Registers a service built by a factory function, its dependencies are unknown
    pub fn add_factory<Service: ?Sized + 'static>(self, lifetime: Lifetime) -> Self {
        self.add(Registration::new(lifetime, ServiceId::of::<Service>()))
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.registrations.iter()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// See [crate::dump()]
    pub fn dump(&self) -> String {
        dump_with(&self.registrations, &AuditOptions::default())
    }

    pub fn dump_with(&self, options: &AuditOptions) -> String {
        dump_with(&self.registrations, options)
    }

    pub fn audit<'a>(&'a self, options: &'a AuditOptions) -> LifetimeAudit<'a> {
        LifetimeAudit::new(&self.registrations, options)
    }

    /// See [crate::assert_dependency_valid]
    pub fn assert_dependency_valid(&self) -> Result<(), AuditError> {
        crate::lifetime_check::assert_dependency_valid(&self.registrations)
    }
}

impl FromIterator<Registration> for ServiceRegistry {
    fn from_iter<I: IntoIterator<Item = Registration>>(iter: I) -> Self {
        ServiceRegistry {
            registrations: iter.into_iter().collect(),
        }
    }
}

impl Extend<Registration> for ServiceRegistry {
    fn extend<I: IntoIterator<Item = Registration>>(&mut self, iter: I) {
        self.registrations.extend(iter);
    }
}

impl IntoIterator for ServiceRegistry {
    type Item = Registration;
    type IntoIter = std::vec::IntoIter<Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.registrations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ServiceRegistry {
    type Item = &'a Registration;
    type IntoIter = std::slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.registrations.iter()
    }
}
