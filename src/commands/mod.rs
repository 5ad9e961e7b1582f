use crate::{Data, Error, errors};

pub mod ping;
pub mod settings;

/// A named, self-contained unit of commands. The constructor may fail on
/// misconfiguration; a failing extension never takes the others down.
pub struct Extension {
    pub name: &'static str,
    pub setup: fn() -> Result<Vec<poise::Command<Data, Error>>, Error>,
}

/// A load failure carried until the gateway is up and the report can be
/// delivered to the owners. Rendered eagerly because the error itself is
/// consumed here.
#[derive(Clone)]
pub struct ExtensionFailure {
    pub name: &'static str,
    pub report: String,
}

/// Returns the declared extension registry
pub fn registry() -> &'static [Extension] {
    &[
        Extension {
            name: "ping",
            setup: ping::setup,
        },
        Extension {
            name: "settings",
            setup: settings::setup,
        },
    ]
}

/// Loads every registered extension before the gateway connects
pub fn load_all() -> (Vec<poise::Command<Data, Error>>, Vec<ExtensionFailure>) {
    load_from(registry())
}

/// Invokes each extension constructor, collecting the commands of the
/// ones that succeed and a rendered report for each one that fails.
pub fn load_from(
    extensions: &[Extension],
) -> (Vec<poise::Command<Data, Error>>, Vec<ExtensionFailure>) {
    let mut commands = Vec::new();
    let mut failures = Vec::new();

    for extension in extensions {
        match (extension.setup)() {
            Ok(mut loaded) => {
                tracing::info!(extension = extension.name, "successfully loaded extension");
                commands.append(&mut loaded);
            }
            Err(error) => {
                tracing::error!(
                    extension = extension.name,
                    error = %error,
                    "failed to load extension"
                );
                failures.push(ExtensionFailure {
                    name: extension.name,
                    report: errors::render_report(&error),
                });
            }
        }
    }

    (commands, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Result<Vec<poise::Command<Data, Error>>, Error> {
        Ok(Vec::new())
    }

    fn broken() -> Result<Vec<poise::Command<Data, Error>>, Error> {
        Err("missing credentials for the broken extension".into())
    }

    #[test]
    fn a_failing_extension_does_not_stop_the_rest() {
        let extensions = [
            Extension {
                name: "first",
                setup: ping::setup,
            },
            Extension {
                name: "second",
                setup: broken,
            },
            Extension {
                name: "third",
                setup: settings::setup,
            },
        ];

        let (commands, failures) = load_from(&extensions);

        assert!(!commands.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "second");
        assert!(failures[0].report.contains("missing credentials"));
    }

    #[test]
    fn the_default_registry_loads_cleanly() {
        let (commands, failures) = load_all();

        assert!(failures.is_empty());
        assert!(commands.len() >= 3);
    }

    #[test]
    fn an_extension_may_register_nothing() {
        let extensions = [Extension {
            name: "empty",
            setup: empty,
        }];

        let (commands, failures) = load_from(&extensions);
        assert!(commands.is_empty());
        assert!(failures.is_empty());
    }
}
