use crate::{
    errors::{AuditError, AuditErrors},
    options::{AuditOptions, ConstructorPolicy},
    service_id::ServiceId,
    types::{Constructor, Implementation, Lifetime, Registration},
};

/// Ensures no singleton captures a scoped service through its constructor
///
/// Uses the default [AuditOptions] and returns the first problem found.
pub fn assert_dependency_valid(registrations: &[Registration]) -> Result<(), AuditError> {
    LifetimeAudit::new(registrations, &AuditOptions::default()).assert_valid()
}

/// Audit of the constructor dependencies of all singleton registrations
///
/// Each constructor parameter of a singleton implementation must resolve to a registered service,
/// and that service must not be scoped.
#[derive(Clone, Copy)]
pub struct LifetimeAudit<'a> {
    registrations: &'a [Registration],
    options: &'a AuditOptions,
}
impl<'a> LifetimeAudit<'a> {
    pub fn new(registrations: &'a [Registration], options: &'a AuditOptions) -> Self {
        Self {
            registrations,
            options,
        }
    }

    /// Lazily yields every problem, in registration and declaration order
    pub fn violations(&self) -> impl Iterator<Item = AuditError> + 'a {
        let Self {
            registrations,
            options,
        } = *self;

        registrations
            .iter()
            .filter(|registration| registration.lifetime == Lifetime::Singleton)
            .filter_map(auditable_implementation)
            .flat_map(move |implementation| {
                audited_constructors(implementation, registrations, options)
                    .into_iter()
                    .flat_map(|constructor| constructor.parameters.iter())
                    .filter_map(move |parameter| {
                        check_parameter(implementation, parameter, registrations, options)
                    })
            })
    }

    /// Fails on the first problem
    pub fn assert_valid(&self) -> Result<(), AuditError> {
        tracing::debug!(
            "Auditing {} singleton registrations",
            self.singleton_count()
        );

        if let Some(error) = self.violations().next() {
            tracing::error!("Dependency audit failed: {error}");
            return Err(error);
        }

        Ok(())
    }

    /// Validate all registrations
    ///
    /// Returns a list of all issues
    pub fn check_all(&self) -> Result<(), AuditErrors> {
        tracing::debug!(
            "Auditing {} singleton registrations",
            self.singleton_count()
        );

        let errors: Vec<_> = self.violations().collect();
        if !errors.is_empty() {
            tracing::error!("Dependency audit found {} problems", errors.len());
            return Err(AuditErrors { errors });
        }

        Ok(())
    }

    fn singleton_count(&self) -> usize {
        self.registrations
            .iter()
            .filter(|registration| registration.lifetime == Lifetime::Singleton)
            .count()
    }
}

fn auditable_implementation(registration: &Registration) -> Option<&Implementation> {
    let Some(implementation) = &registration.implementation else {
        tracing::debug!(
            "Skipping {}, it has no implementation type to inspect",
            registration.service
        );
        return None;
    };

    if registration.skip_lifetime_check {
        tracing::debug!(
            "Skipping {}, it opted out of the lifetime check",
            implementation.id
        );
        return None;
    }

    Some(implementation)
}

fn audited_constructors<'i>(
    implementation: &'i Implementation,
    registrations: &[Registration],
    options: &AuditOptions,
) -> Vec<&'i Constructor> {
    match options.constructor_policy {
        ConstructorPolicy::All => implementation.constructors.iter().collect(),
        ConstructorPolicy::Selected => {
            let resolvable = implementation.constructors.iter().filter(|constructor| {
                constructor.parameters.iter().all(|parameter| {
                    let required = options.unwrap_collection(parameter);
                    options.is_provider(required) || resolve(required, registrations).is_some()
                })
            });

            // Nothing resolves - keep the greediest so the missing service gets reported
            first_longest(resolvable)
                .or_else(|| first_longest(implementation.constructors.iter()))
                .into_iter()
                .collect()
        }
    }
}

/// Constructor with the most parameters, the earliest declared one on ties
fn first_longest<'i>(
    constructors: impl Iterator<Item = &'i Constructor>,
) -> Option<&'i Constructor> {
    constructors.fold(None, |best, constructor| match best {
        Some(best) if best.parameters.len() >= constructor.parameters.len() => Some(best),
        _ => Some(constructor),
    })
}

fn check_parameter(
    consumer: &Implementation,
    parameter: &ServiceId,
    registrations: &[Registration],
    options: &AuditOptions,
) -> Option<AuditError> {
    let required = options.unwrap_collection(parameter);

    if options.is_provider(required) {
        tracing::debug!("{} takes the service provider {required}, skipping", consumer.id);
        return None;
    }

    let Some(dependency) = resolve(required, registrations) else {
        return Some(AuditError::UnresolvedDependency {
            consumer: consumer.id.clone(),
            missing: required.clone(),
        });
    };

    if dependency.lifetime == Lifetime::Scoped {
        return Some(AuditError::LifetimeViolation {
            consumer: consumer.id.clone(),
            dependency: required.clone(),
        });
    }

    None
}

/// First registration able to supply the required service
fn resolve<'r>(required: &ServiceId, registrations: &'r [Registration]) -> Option<&'r Registration> {
    registrations
        .iter()
        .find(|registration| registration.service.satisfies(required))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_id::TypeArg;

    fn id(name: &'static str) -> ServiceId {
        ServiceId::named(name)
    }

    fn singleton(
        service: &'static str,
        implementation: &'static str,
        constructors: Vec<Constructor>,
    ) -> Registration {
        Registration::singleton(id(service)).implemented_by(Implementation {
            id: id(implementation),
            constructors,
        })
    }

    #[test]
    fn only_singletons_are_audited() {
        let registrations = [
            Registration::scoped(id("IFoo")).implemented_by(
                Implementation::new(id("Foo")).with_constructor(Constructor::new([id("IMissing")])),
            ),
            Registration::transient(id("IBar")).implemented_by(
                Implementation::new(id("Bar")).with_constructor(Constructor::new([id("IMissing")])),
            ),
        ];

        assert_eq!(assert_dependency_valid(&registrations), Ok(()));
    }

    #[test]
    fn registrations_without_implementation_are_exempt() {
        let registrations = [Registration::singleton(id("IFoo")), Registration::scoped(id("IBar"))];

        assert_eq!(assert_dependency_valid(&registrations), Ok(()));
    }

    #[test]
    fn transient_dependencies_are_allowed() {
        let registrations = [
            singleton("IFoo", "Foo", vec![Constructor::new([id("IBar")])]),
            Registration::transient(id("IBar")),
        ];

        assert_eq!(assert_dependency_valid(&registrations), Ok(()));
    }

    #[test]
    fn first_matching_registration_wins() {
        let registrations = [
            singleton("IFoo", "Foo", vec![Constructor::new([id("IBar")])]),
            Registration::singleton(id("IBar")),
            Registration::scoped(id("IBar")),
        ];
        assert_eq!(assert_dependency_valid(&registrations), Ok(()));

        let reversed = [
            singleton("IFoo", "Foo", vec![Constructor::new([id("IBar")])]),
            Registration::scoped(id("IBar")),
            Registration::singleton(id("IBar")),
        ];
        assert_eq!(
            assert_dependency_valid(&reversed),
            Err(AuditError::LifetimeViolation {
                consumer: id("Foo"),
                dependency: id("IBar"),
            })
        );
    }

    #[test]
    fn open_generic_registrations_resolve_closed_dependencies() {
        let logger_of_foo = ServiceId::generic("Logger", [id("Foo")]);
        let registrations = [
            singleton("IFoo", "Foo", vec![Constructor::new([logger_of_foo])]),
            Registration::singleton(ServiceId::generic("Logger", [TypeArg::param("T")])),
        ];

        assert_eq!(assert_dependency_valid(&registrations), Ok(()));
    }

    #[test]
    fn generic_dependencies_match_structurally() {
        let registrations = [
            singleton(
                "IFoo",
                "Foo",
                vec![Constructor::new([ServiceId::generic("Repository", [id("User")])])],
            ),
            Registration::singleton(ServiceId::generic("Repository", [id("Order")])),
        ];

        assert_eq!(
            assert_dependency_valid(&registrations),
            Err(AuditError::UnresolvedDependency {
                consumer: id("Foo"),
                missing: ServiceId::generic("Repository", [id("User")]),
            })
        );
    }

    #[test]
    fn collections_report_the_missing_element() {
        let registrations = [singleton(
            "IFoo",
            "Foo",
            vec![Constructor::new([ServiceId::of::<Vec<u8>>()])],
        )];

        assert_eq!(
            assert_dependency_valid(&registrations),
            Err(AuditError::UnresolvedDependency {
                consumer: id("Foo"),
                missing: id("u8"),
            })
        );
    }

    #[test]
    fn custom_provider_services_are_skipped() {
        let registrations = [singleton("IFoo", "Foo", vec![Constructor::new([id("Injector")])])];

        assert!(assert_dependency_valid(&registrations).is_err());

        let options = AuditOptions::default().provider_service(id("Injector"));
        assert_eq!(LifetimeAudit::new(&registrations, &options).assert_valid(), Ok(()));
    }

    #[test]
    fn all_constructors_are_checked_by_default() {
        let registrations = [
            singleton(
                "IFoo",
                "Foo",
                vec![
                    Constructor::new([id("IBar")]),
                    Constructor::new([id("IBar"), id("IUnused")]),
                ],
            ),
            Registration::singleton(id("IBar")),
        ];

        assert_eq!(
            assert_dependency_valid(&registrations),
            Err(AuditError::UnresolvedDependency {
                consumer: id("Foo"),
                missing: id("IUnused"),
            })
        );
    }

    #[test]
    fn selected_policy_checks_the_greediest_resolvable_constructor() {
        let registrations = [
            singleton(
                "IFoo",
                "Foo",
                vec![
                    Constructor::new([id("IBar")]),
                    Constructor::new([id("IBar"), id("IUnused")]),
                    Constructor::new([id("IBar"), id("ISession")]),
                ],
            ),
            Registration::singleton(id("IBar")),
            Registration::scoped(id("ISession")),
        ];
        let options = AuditOptions::default().constructor_policy(ConstructorPolicy::Selected);

        assert_eq!(
            LifetimeAudit::new(&registrations, &options).assert_valid(),
            Err(AuditError::LifetimeViolation {
                consumer: id("Foo"),
                dependency: id("ISession"),
            })
        );
    }

    #[test]
    fn selected_policy_ignores_unused_overloads() {
        let registrations = [
            singleton(
                "IFoo",
                "Foo",
                vec![
                    Constructor::new([id("IUnused")]),
                    Constructor::new([id("IBar")]),
                ],
            ),
            Registration::singleton(id("IBar")),
        ];
        let options = AuditOptions::default().constructor_policy(ConstructorPolicy::Selected);

        assert_eq!(LifetimeAudit::new(&registrations, &options).assert_valid(), Ok(()));
    }

    #[test]
    fn selected_policy_reports_when_nothing_resolves() {
        let registrations = [singleton(
            "IFoo",
            "Foo",
            vec![
                Constructor::new([id("IMissing")]),
                Constructor::new([id("IMissing"), id("IAlsoMissing")]),
            ],
        )];
        let options = AuditOptions::default().constructor_policy(ConstructorPolicy::Selected);

        let errors = LifetimeAudit::new(&registrations, &options)
            .check_all()
            .unwrap_err()
            .errors;
        assert_eq!(
            errors,
            vec![
                AuditError::UnresolvedDependency {
                    consumer: id("Foo"),
                    missing: id("IMissing"),
                },
                AuditError::UnresolvedDependency {
                    consumer: id("Foo"),
                    missing: id("IAlsoMissing"),
                },
            ]
        );
    }

    #[test]
    fn selected_policy_prefers_the_earliest_of_equally_long_constructors() {
        let session_first = [
            singleton(
                "IFoo",
                "Foo",
                vec![
                    Constructor::new([id("IBar"), id("ISession")]),
                    Constructor::new([id("IBar"), id("IBar")]),
                ],
            ),
            Registration::singleton(id("IBar")),
            Registration::scoped(id("ISession")),
        ];
        let options = AuditOptions::default().constructor_policy(ConstructorPolicy::Selected);

        assert_eq!(
            LifetimeAudit::new(&session_first, &options).assert_valid(),
            Err(AuditError::LifetimeViolation {
                consumer: id("Foo"),
                dependency: id("ISession"),
            })
        );

        let session_last = [
            singleton(
                "IFoo",
                "Foo",
                vec![
                    Constructor::new([id("IBar"), id("IBar")]),
                    Constructor::new([id("IBar"), id("ISession")]),
                ],
            ),
            Registration::singleton(id("IBar")),
            Registration::scoped(id("ISession")),
        ];

        assert_eq!(LifetimeAudit::new(&session_last, &options).assert_valid(), Ok(()));
    }

    #[test]
    fn selected_policy_falls_back_to_the_earliest_unresolvable_constructor() {
        let registrations = [singleton(
            "IFoo",
            "Foo",
            vec![
                Constructor::new([id("IFirstMissing")]),
                Constructor::new([id("ISecondMissing")]),
            ],
        )];
        let options = AuditOptions::default().constructor_policy(ConstructorPolicy::Selected);

        let errors = LifetimeAudit::new(&registrations, &options)
            .check_all()
            .unwrap_err()
            .errors;
        assert_eq!(
            errors,
            vec![AuditError::UnresolvedDependency {
                consumer: id("Foo"),
                missing: id("IFirstMissing"),
            }]
        );
    }

    #[test]
    fn check_all_reports_every_problem_in_order() {
        let registrations = [
            singleton("IFoo", "Foo", vec![Constructor::new([id("ISession"), id("IMissing")])]),
            singleton("IBar", "Bar", vec![Constructor::new([id("ISession")])]),
            Registration::scoped(id("ISession")),
        ];
        let options = AuditOptions::default();
        let audit = LifetimeAudit::new(&registrations, &options);

        let errors = audit.check_all().unwrap_err();
        assert_eq!(
            errors.errors,
            vec![
                AuditError::LifetimeViolation {
                    consumer: id("Foo"),
                    dependency: id("ISession"),
                },
                AuditError::UnresolvedDependency {
                    consumer: id("Foo"),
                    missing: id("IMissing"),
                },
                AuditError::LifetimeViolation {
                    consumer: id("Bar"),
                    dependency: id("ISession"),
                },
            ]
        );
        assert_eq!(audit.assert_valid(), Err(errors.errors[0].clone()));
        assert_eq!(
            errors.to_string().lines().count(),
            4,
            "header plus one line per problem"
        );
    }
}
