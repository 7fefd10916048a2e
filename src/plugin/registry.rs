//! Plugin registry.
//!
//! Resolves the plugin identifiers declared in the configuration against a
//! static catalog and builds the command table the router dispatches on.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::{PluginDescriptor, PluginManifest};
use crate::cmd::{AUTOCOMPLETE_COMMAND, HELP_COMMAND};
use crate::error::RegistryError;

/// Plugins available under one namespace.
#[derive(Debug, Clone, Copy)]
pub struct PluginCatalog {
    namespace: &'static str,
    manifests: &'static [PluginManifest],
}

impl PluginCatalog {
    pub const fn new(namespace: &'static str, manifests: &'static [PluginManifest]) -> Self {
        Self {
            namespace,
            manifests,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn find(&self, id: &str) -> Option<&'static PluginManifest> {
        self.manifests.iter().find(|m| m.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        self.manifests.iter().map(|m| m.id)
    }
}

/// Command name -> plugin. Iteration is sorted by name.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: BTreeMap<String, PluginDescriptor>,
}

impl CommandTable {
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn insert(&mut self, descriptor: PluginDescriptor) -> Result<(), RegistryError> {
        if let Some(existing) = self.commands.get(&descriptor.name) {
            return Err(RegistryError::DuplicateCommand {
                name: descriptor.name.clone(),
                first: existing.source.clone(),
                second: descriptor.source,
            });
        }
        self.commands.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }
}

/// Load every plugin in `ids` from `catalog`.
///
/// Fails when an identifier is unknown, when `namespace` is not the
/// catalog's, when a plugin declares an unusable command name, or when two
/// plugins declare the same name. An identifier listed more than once is
/// loaded once. An empty `ids` yields an empty table.
pub fn load(
    ids: &[String],
    namespace: &str,
    catalog: &PluginCatalog,
) -> Result<CommandTable, RegistryError> {
    let mut table = CommandTable::default();
    let mut seen = HashSet::new();

    for id in ids {
        if !seen.insert(id.as_str()) {
            debug!(%id, "plugin already loaded; skipping repeat");
            continue;
        }
        if namespace != catalog.namespace() {
            return Err(RegistryError::PluginLoad {
                id: id.clone(),
                namespace: namespace.to_string(),
                reason: format!("unknown namespace (available: '{}')", catalog.namespace()),
            });
        }

        let manifest = catalog.find(id).ok_or_else(|| RegistryError::PluginLoad {
            id: id.clone(),
            namespace: namespace.to_string(),
            reason: "no such plugin".into(),
        })?;

        if !is_valid_command_name(manifest.name) {
            return Err(RegistryError::InvalidName {
                id: id.clone(),
                name: manifest.name.to_string(),
            });
        }

        let source = format!("{namespace}::{id}");
        debug!(command = manifest.name, %source, "registered plugin");
        table.insert(PluginDescriptor::new(
            manifest.name,
            manifest.short_help,
            source,
            manifest.factory,
        ))?;
    }

    debug!(count = table.len(), "command table ready");
    Ok(table)
}

/// Names must be a single shell word, not an option, and not shadow a
/// meta-command.
fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.chars().any(char::is_whitespace)
        && name != HELP_COMMAND
        && name != AUTOCOMPLETE_COMMAND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::testing::{self, NAMESPACE};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_descriptor_per_declared_plugin() {
        let table = load(&ids(&["echo", "broken", "abort"]), NAMESPACE, &testing::catalog())
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["abort", "broken", "echo"]
        );
        let echo = table.get("echo").unwrap();
        assert_eq!(echo.short_help, "Echo arguments back");
        assert_eq!(echo.source, "plugins::echo");
    }

    #[test]
    fn empty_declaration_is_valid() {
        let table = load(&[], NAMESPACE, &testing::catalog()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn unknown_plugin_fails_to_load() {
        let err = load(&ids(&["echo", "nope"]), NAMESPACE, &testing::catalog()).unwrap_err();
        match err {
            RegistryError::PluginLoad { id, reason, .. } => {
                assert_eq!(id, "nope");
                assert_eq!(reason, "no such plugin");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn foreign_namespace_fails_to_load() {
        let err = load(&ids(&["echo"]), "contrib", &testing::catalog()).unwrap_err();
        assert!(matches!(err, RegistryError::PluginLoad { .. }));
        assert!(err.to_string().contains("contrib"));
    }

    #[test]
    fn duplicate_command_names_rejected() {
        let err = load(&ids(&["echo", "echo-again"]), NAMESPACE, &testing::catalog())
            .unwrap_err();
        match err {
            RegistryError::DuplicateCommand {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "echo");
                assert_eq!(first, "plugins::echo");
                assert_eq!(second, "plugins::echo-again");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_plugin_id_loads_once() {
        let table = load(&ids(&["echo", "broken", "echo"]), NAMESPACE, &testing::catalog())
            .unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["broken", "echo"]);
        assert_eq!(table.get("echo").unwrap().source, "plugins::echo");
    }

    #[test]
    fn meta_command_names_are_reserved() {
        let err = load(&ids(&["shadow-help"]), NAMESPACE, &testing::catalog()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }));
    }

    #[test]
    fn command_name_rules() {
        assert!(is_valid_command_name("agent"));
        assert!(!is_valid_command_name(""));
        assert!(!is_valid_command_name("--agent"));
        assert!(!is_valid_command_name("two words"));
        assert!(!is_valid_command_name("__autocomplete__"));
    }
}
