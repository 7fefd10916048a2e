/*!
Plugin contract.

Every subcommand of the `mesos` CLI is a plugin: an opaque handler that
can run (`main`) and complete its own arguments (`autocomplete`). The
dispatcher only sees plugins through:

  - `Plugin`            the handler trait
  - `PluginManifest`    static declaration (id, command name, short help, factory)
  - `PluginDescriptor`  a registered manifest, keyed by command name
  - `Completion`        (mode, candidates) answer to a completion request

Handlers are never cached: `PluginDescriptor::instantiate` builds a fresh
one from the configuration for every dispatch.
*/

pub mod base;
pub mod registry;

#[cfg(test)]
pub mod testing;

use std::fmt;
use std::io::Write;

use crate::config::Config;

/// Completion mode token understood by the shell completion layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionMode {
    /// Complete from the candidate words.
    Default,
    /// Let the shell complete file names.
    File,
    /// Plugin-defined mode token. None of the built-in plugins needs one.
    #[allow(dead_code)]
    Custom(String),
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionMode::Default => f.write_str("default"),
            CompletionMode::File => f.write_str("file"),
            CompletionMode::Custom(token) => f.write_str(token),
        }
    }
}

/// Answer to a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub mode: CompletionMode,
    pub candidates: Vec<String>,
}

impl Completion {
    pub fn new(mode: CompletionMode, candidates: Vec<String>) -> Self {
        Self { mode, candidates }
    }

    /// Candidates in `default` mode.
    pub fn words(candidates: Vec<String>) -> Self {
        Self::new(CompletionMode::Default, candidates)
    }

    /// `default` mode, nothing to offer.
    pub fn empty() -> Self {
        Self::words(Vec::new())
    }

    /// Two-line wire form: mode token, then space-joined candidates.
    pub fn render(&self) -> String {
        format!("{}\n{}\n", self.mode, self.candidates.join(" "))
    }
}

/// Handler for one top-level command.
pub trait Plugin {
    /// Run the command with the arguments following its name.
    fn main(&mut self, args: &[String], out: &mut dyn Write) -> anyhow::Result<()>;

    /// Complete `current_word`, given the arguments already typed after the
    /// command name.
    fn autocomplete(&self, current_word: &str, args: &[String]) -> anyhow::Result<Completion>;
}

/// Builds a fresh handler for one dispatch.
pub type PluginFactory = fn(&Config) -> Box<dyn Plugin>;

/// Static declaration of an installable plugin.
#[derive(Clone, Copy)]
pub struct PluginManifest {
    /// Identifier used in the configuration's plugin list.
    pub id: &'static str,
    /// Command name the plugin is routed by.
    pub name: &'static str,
    /// One-line summary for the global usage listing.
    pub short_help: &'static str,
    pub factory: PluginFactory,
}

impl fmt::Debug for PluginManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManifest")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("short_help", &self.short_help)
            .finish_non_exhaustive()
    }
}

/// A registered plugin.
#[derive(Clone)]
pub struct PluginDescriptor {
    pub name: String,
    pub short_help: String,
    /// Where the plugin came from (`<namespace>::<id>`), for diagnostics.
    pub source: String,
    factory: PluginFactory,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        short_help: impl Into<String>,
        source: impl Into<String>,
        factory: PluginFactory,
    ) -> Self {
        Self {
            name: name.into(),
            short_help: short_help.into(),
            source: source.into(),
            factory,
        }
    }

    /// Build a fresh handler.
    pub fn instantiate(&self, config: &Config) -> Box<dyn Plugin> {
        (self.factory)(config)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("short_help", &self.short_help)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
