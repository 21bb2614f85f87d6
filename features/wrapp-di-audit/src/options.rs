use std::borrow::Cow;

use crate::service_id::ServiceId;

/// Which constructors of a singleton are audited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConstructorPolicy {
    /// Every declared constructor, even overloads the container would never pick
    #[default]
    All,
    /// Only the constructor the container would pick: the one with the most parameters
    /// which all resolve, earliest declared on ties
    Selected,
}

/// Options for dumping and auditing a registry
///
/// # Example
/// ```rust
/// use wrapp_di_audit::{AuditOptions, ConstructorPolicy, ServiceId};
///
/// let options = AuditOptions::default()
///     .line_terminator("\r\n")
///     .constructor_policy(ConstructorPolicy::Selected)
///     .provider_service(ServiceId::named("Injector"));
///
/// assert_eq!(options.line_terminator, "\r\n");
/// assert!(options.is_provider(&ServiceId::named("Injector")));
/// ```
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Separates lines of the dump
    pub line_terminator: Cow<'static, str>,
    pub constructor_policy: ConstructorPolicy,
    /// Services handed out by the container itself, these are never registered
    pub provider_services: Vec<ServiceId>,
    /// Names of single-argument generics used for collection injection - `IEnumerable<Foo>` requires `Foo`
    pub collection_types: Vec<Cow<'static, str>>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        AuditOptions {
            line_terminator: Cow::Borrowed("\n"),
            constructor_policy: ConstructorPolicy::default(),
            provider_services: vec![ServiceId::named("ServiceProvider")],
            collection_types: vec![Cow::Borrowed("IEnumerable"), Cow::Borrowed("alloc::vec::Vec")],
        }
    }
}

impl AuditOptions {
    pub fn line_terminator(mut self, terminator: impl Into<Cow<'static, str>>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    pub fn constructor_policy(mut self, policy: ConstructorPolicy) -> Self {
        self.constructor_policy = policy;
        self
    }

    /// Adds a service which the container always supplies
    pub fn provider_service(mut self, service: ServiceId) -> Self {
        self.provider_services.push(service);
        self
    }

    /// Adds a collection type
    pub fn collection_type(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.collection_types.push(name.into());
        self
    }

    pub fn is_provider(&self, service: &ServiceId) -> bool {
        self.provider_services.contains(service)
    }

    /// Unwraps collection injections to the element service, anything else is returned as is
    pub fn unwrap_collection<'a>(&self, service: &'a ServiceId) -> &'a ServiceId {
        if !self
            .collection_types
            .iter()
            .any(|collection| collection.as_ref() == service.name())
        {
            return service;
        }

        service.single_concrete_arg().unwrap_or(service)
    }
}
