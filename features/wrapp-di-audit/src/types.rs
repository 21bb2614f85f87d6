use std::fmt;

use crate::service_id::ServiceId;

/// How long a container keeps a resolved instance around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance for the whole application
    Singleton,
    /// One instance per scope (e.g. per request)
    Scoped,
    /// A new instance on every resolution
    Transient,
}

impl Lifetime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One constructor of an implementation and the services it takes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    pub parameters: Vec<ServiceId>,
}

impl Constructor {
    pub fn new(parameters: impl IntoIterator<Item = ServiceId>) -> Self {
        Constructor {
            parameters: parameters.into_iter().collect(),
        }
    }
}

/// Declared dependency graph of an implementation type
///
/// Lists every constructor the type offers, so dependencies can be audited without instantiating anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementation {
    pub id: ServiceId,
    pub constructors: Vec<Constructor>,
}

impl Implementation {
    pub fn new(id: ServiceId) -> Self {
        Implementation {
            id,
            constructors: Vec::new(),
        }
    }

    /// Adds a constructor
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Builds the implementation from a [Component]
    pub fn of<T: Component>() -> Self {
        Implementation {
            id: ServiceId::of::<T>(),
            constructors: T::constructors(),
        }
    }
}

/// A type which declares how it is constructed
///
/// # Example
/// ```rust
/// use wrapp_di_audit::{Component, Constructor, ServiceId};
///
/// struct Clock;
/// struct ReportService;
///
/// impl Component for ReportService {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new([ServiceId::of::<Clock>()])]
///     }
/// }
/// ```
pub trait Component: 'static {
    /// Returns all constructors of the type, with the services each one requires
    fn constructors() -> Vec<Constructor>;
}

/// A single entry of the service registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub lifetime: Lifetime,
    /// The service consumers ask for
    pub service: ServiceId,
    /// None for factory and instance registrations, those can't be audited
    pub implementation: Option<Implementation>,
    /// Opt out of the lifetime audit for this registration
    pub skip_lifetime_check: bool,
}

impl Registration {
    pub fn new(lifetime: Lifetime, service: ServiceId) -> Self {
        Registration {
            lifetime,
            service,
            implementation: None,
            skip_lifetime_check: false,
        }
    }

    pub fn singleton(service: ServiceId) -> Self {
        Self::new(Lifetime::Singleton, service)
    }

    pub fn scoped(service: ServiceId) -> Self {
        Self::new(Lifetime::Scoped, service)
    }

    pub fn transient(service: ServiceId) -> Self {
        Self::new(Lifetime::Transient, service)
    }

    /// Registers `Service` implemented by the [Component] `Impl`
    pub fn of<Service: ?Sized + 'static, Impl: Component>(lifetime: Lifetime) -> Self {
        Self::new(lifetime, ServiceId::of::<Service>()).implemented_by(Implementation::of::<Impl>())
    }

    pub fn implemented_by(mut self, implementation: Implementation) -> Self {
        self.implementation = Some(implementation);
        self
    }

    /// Excludes this registration from the lifetime audit
    ///
    /// Meant for services whose declared constructors reference things the registry can't express.
    pub fn skip_lifetime_check(mut self) -> Self {
        self.skip_lifetime_check = true;
        self
    }
}
