use dotwire::{
    Arguments, Container, DependencySpec, InstantiateErrorKind, Overrides, Parameter, PrimitiveKind, Registry, ResolveErrorKind,
    SpecStore,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

trait LoggerInterface: Send + Sync {
    fn id(&self) -> usize;
}

struct Logger {
    id: usize,
}

impl LoggerInterface for Logger {
    fn id(&self) -> usize {
        self.id
    }
}

struct Service {
    logger: Arc<dyn LoggerInterface>,
    retries: i64,
}

struct Repository {
    logger: Arc<Logger>,
}

struct Handler {
    repository: Arc<Repository>,
    logger: Arc<Logger>,
}

fn registry() -> Registry {
    let ids = Arc::new(AtomicUsize::new(0));

    Registry::new()
        .provide_interface::<dyn LoggerInterface>("app.LoggerInterface")
        .implement("app.LoggerInterface", |logger: Arc<Logger>| logger as Arc<dyn LoggerInterface>)
        .provide("app.Logger", move || {
            Ok(Logger {
                id: ids.fetch_add(1, Ordering::SeqCst),
            })
        })
        .provide_with_params(
            "app.Service",
            [
                Parameter::typed("logger", "app.LoggerInterface"),
                Parameter::primitive("retries", PrimitiveKind::Int),
            ],
            |arguments: Arguments| {
                Ok::<_, InstantiateErrorKind>(Service {
                    logger: arguments.get("logger")?,
                    retries: arguments.get_cloned("retries")?,
                })
            },
        )
        .provide_with_params("app.Repository", [Parameter::typed("logger", "app.Logger")], |arguments: Arguments| {
            Ok::<_, InstantiateErrorKind>(Repository {
                logger: arguments.get("logger")?,
            })
        })
        .provide_with_params(
            "app.Handler",
            [
                Parameter::typed("repository", "app.Repository"),
                Parameter::typed("logger", "app.Logger"),
            ],
            |arguments: Arguments| {
                Ok::<_, InstantiateErrorKind>(Handler {
                    repository: arguments.get("repository")?,
                    logger: arguments.get("logger")?,
                })
            },
        )
}

#[test]
fn test_auto_wiring_without_specs() {
    let container = Container::new(registry(), SpecStore::new());

    let handler = container.make::<Handler>("app.Handler").unwrap();
    // Not shared, so every parameter gets its own instance
    assert_ne!(handler.logger.id, handler.repository.logger.id);
}

#[test]
fn test_shared_logger_scenario() {
    let container = Container::new(
        registry(),
        SpecStore::new().with("app.Logger", DependencySpec::new().with_shared(true)),
    );

    let first = container.make::<Logger>("app.Logger").unwrap();
    let second = container.make::<Logger>("app.Logger").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    container.clear_shared("app.Logger");
    let third = container.make::<Logger>("app.Logger").unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_ne!(first.id, third.id);

    let custom = Arc::new(Logger { id: 100 });
    container.register_shared("app.Logger", custom.clone()).unwrap();
    assert!(Arc::ptr_eq(&container.make::<Logger>("app.Logger").unwrap(), &custom));

    // Shared dependencies are reused across the graph
    let handler = container.make::<Handler>("app.Handler").unwrap();
    assert_eq!(handler.logger.id, 100);
    assert_eq!(handler.repository.logger.id, 100);
}

#[test]
fn test_service_scenario() {
    let container = Container::new(
        registry(),
        SpecStore::new().with("app.Service", DependencySpec::new().with_param("logger", "app.Logger")),
    );

    let service = container
        .make_with::<Service>("app.Service", &Overrides::new().with("retries", 3i64))
        .unwrap();
    assert_eq!(service.retries, 3);
    assert_eq!(service.logger.id(), 0);
}

#[test]
fn test_overrides_ignored_for_cached() {
    let container = Container::new(
        registry(),
        SpecStore::new().with(
            "app.Service",
            DependencySpec::new().with_param("logger", "app.Logger").with_shared(true),
        ),
    );

    let first = container
        .make_with::<Service>("app.Service", &Overrides::new().with("retries", 3i64))
        .unwrap();
    let second = container
        .make_with::<Service>("app.Service", &Overrides::new().with("retries", 7i64))
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.retries, 3);
}

#[test]
fn test_cyclic_specs() {
    struct A;
    struct B;

    let registry = Registry::new()
        .provide_with_params("app.A", [Parameter::typed("b", "app.B")], || Ok(A))
        .provide_with_params("app.B", [Parameter::typed("a", "app.A")], || Ok(B));
    let container = Container::new(registry, SpecStore::new());

    let err = container.make::<A>("app.A").err().unwrap();
    assert!(matches!(err, ResolveErrorKind::CyclicDependency { .. }));
    assert_eq!(err.to_string(), "Cyclic dependency detected: app.A -> app.B -> app.A");
    assert!(container.detect_cycles().is_err());
}

#[test]
fn test_error_messages_name_identifiers() {
    let container = Container::new(registry(), SpecStore::new());

    let err = container.make::<Service>("app.Servce").err().unwrap();
    assert_eq!(err.ident(), Some("app.Servce"));
    assert!(err.to_string().contains("app.Servce"));

    let err = container
        .make_with::<Service>("app.Service", &Overrides::new().with("retries", 1i64))
        .err()
        .unwrap();
    assert_eq!(err.ident(), Some("app.LoggerInterface"));
}
