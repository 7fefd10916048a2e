//! Error kinds shared by the dispatcher, the plugin registry and plugins.
//!
//! `CliError` is the only kind the process boundary renders for the user
//! (`Error: <message>.`). Registry failures are fatal before dispatch and
//! completion failures never leave the autocomplete path.

use thiserror::Error;

/// User-facing, expected failure raised by the router or by plugin code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generic failure message (rendered verbatim, no trailing period).
    #[error("{0}")]
    Message(String),

    /// Configuration could not be read or is invalid.
    #[error("{0}")]
    Config(String),

    /// The user aborted the running command.
    #[error("interrupted")]
    Interrupted,
}

impl CliError {
    pub fn msg(message: impl Into<String>) -> Self {
        CliError::Message(message.into())
    }
}

/// Failures while building the command table from declared plugins.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("plugin '{id}' could not be loaded from namespace '{namespace}': {reason}")]
    PluginLoad {
        id: String,
        namespace: String,
        reason: String,
    },

    #[error("command '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateCommand {
        name: String,
        first: String,
        second: String,
    },

    #[error("plugin '{id}' declares an invalid command name '{name}'")]
    InvalidName { id: String, name: String },
}

/// Failures while resolving shell completions. The router turns every one
/// of these into an empty completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no plugin named '{0}'")]
    UnknownPlugin(String),

    #[error("plugin '{name}' failed to complete")]
    Plugin {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("plugin '{0}' panicked while completing")]
    PluginPanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_displays_message_verbatim() {
        assert_eq!(CliError::msg("not found").to_string(), "not found");
        assert_eq!(
            CliError::Config("bad master".into()).to_string(),
            "bad master"
        );
    }

    #[test]
    fn registry_error_names_both_sources() {
        let err = RegistryError::DuplicateCommand {
            name: "agent".into(),
            first: "plugins::agent".into(),
            second: "plugins::agents".into(),
        };
        let text = err.to_string();
        assert!(text.contains("plugins::agent"));
        assert!(text.contains("plugins::agents"));
    }

    #[test]
    fn completion_error_keeps_plugin_source() {
        let err = CompletionError::Plugin {
            name: "task".into(),
            source: anyhow::anyhow!("boom"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }
}
