use dotwire::{
    Arguments, Bootstrap, BootstrapErrorKind, ConfigErrorKind, InstantiateErrorKind, Parameter, Registry, ResolveErrorKind, CONTAINER_IDENT,
};
use std::sync::Arc;

struct Config {
    retries: u32,
}

trait Transport: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Smtp;

impl Transport for Smtp {
    fn name(&self) -> &'static str {
        "smtp"
    }
}

struct Mailer {
    transport: Arc<dyn Transport>,
    config: Arc<Config>,
}

struct App {
    mailer: Arc<Mailer>,
}

fn registry() -> Registry {
    Registry::new()
        .provide_interface::<Config>("app.Config")
        .provide_interface::<dyn Transport>("app.Transport")
        .provide("app.Smtp", || Ok(Smtp))
        .implement("app.Transport", |smtp: Arc<Smtp>| smtp as Arc<dyn Transport>)
        .provide_with_params(
            "app.Mailer",
            [
                Parameter::typed("transport", "app.Transport"),
                Parameter::typed("config", "app.Config"),
            ],
            |arguments: Arguments| {
                Ok::<_, InstantiateErrorKind>(Mailer {
                    transport: arguments.get("transport")?,
                    config: arguments.get("config")?,
                })
            },
        )
        .provide_with_params(
            "app.App",
            [Parameter::typed("container", CONTAINER_IDENT)],
            |arguments: Arguments| {
                let container = arguments.get::<dotwire::Container>("container")?;
                Ok::<_, InstantiateErrorKind>(App {
                    mailer: container.make("app.Mailer").map_err(anyhow::Error::from)?,
                })
            },
        )
}

const SPECS: &str = r#"{
    "app.Mailer": { "transport": "app.Smtp", "_shared": true },
    "app.App": { "_shared": true }
}"#;

#[test]
fn test_run() {
    let (container, app) = Bootstrap::new(registry())
        .with_specs_json(SPECS)
        .unwrap()
        .with_shared("app.Config", Arc::new(Config { retries: 3 }))
        .run::<App>("app.App")
        .unwrap();

    assert_eq!(app.mailer.transport.name(), "smtp");
    assert_eq!(app.mailer.config.retries, 3);
    assert!(Arc::ptr_eq(&app, &container.make::<App>("app.App").unwrap()));
    assert!(Arc::ptr_eq(&app.mailer, &container.make::<Mailer>("app.Mailer").unwrap()));
}

#[test]
fn test_run_without_config() {
    let err = Bootstrap::new(registry())
        .with_specs_json(SPECS)
        .unwrap()
        .run::<App>("app.App")
        .err()
        .unwrap();

    assert!(matches!(
        err,
        BootstrapErrorKind::Resolve(ResolveErrorKind::Instantiate {
            source: InstantiateErrorKind::Custom(_),
            ..
        })
    ));
}

#[test]
fn test_invalid_specs() {
    let err = Bootstrap::new(registry())
        .with_specs_json(r#"{ "app.Mailer": { "_shared": "true" } }"#)
        .err()
        .unwrap();

    assert!(matches!(
        err,
        BootstrapErrorKind::Config(ConfigErrorKind::InvalidShared { ident }) if &*ident == "app.Mailer"
    ));
}

#[test]
fn test_shared_mismatch() {
    let err = Bootstrap::new(registry())
        .with_shared("app.Config", Arc::new(Smtp))
        .build()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        BootstrapErrorKind::Resolve(ResolveErrorKind::TypeMismatch { ident, .. }) if &*ident == "app.Config"
    ));
}
