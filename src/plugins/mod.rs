//! Built-in plugins shipped with the `mesos` binary.

pub mod config;
pub mod master;

use crate::config::DEFAULT_NAMESPACE;
use crate::plugin::PluginManifest;
use crate::plugin::registry::PluginCatalog;

static BUILTIN: &[PluginManifest] = &[config::MANIFEST, master::MANIFEST];

/// Catalog the configuration's plugin identifiers resolve against.
pub fn catalog() -> PluginCatalog {
    PluginCatalog::new(DEFAULT_NAMESPACE, BUILTIN)
}

/// Identifiers of every built-in plugin (the default plugin list).
pub fn builtin_ids() -> Vec<String> {
    catalog().ids().map(str::to_string).collect()
}
