/*!
`config` plugin: inspect the CLI's own configuration.

  mesos config show [--json]   effective configuration (YAML, or JSON)
  mesos config path            configuration file consulted
  mesos config plugins         declared plugin identifiers
  mesos config check <FILE>    validate a configuration file
*/

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;
use crate::plugin::base::{complete_from_command, parse_args};
use crate::plugin::{Completion, Plugin, PluginManifest};

pub const NAME: &str = "config";
pub const SHORT_HELP: &str = "Interact with the Mesos CLI configuration";

pub const MANIFEST: PluginManifest = PluginManifest {
    id: NAME,
    name: NAME,
    short_help: SHORT_HELP,
    factory: new_plugin,
};

#[derive(Parser, Debug)]
#[command(
    name = NAME,
    about = SHORT_HELP,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration
    Show {
        /// Output JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Print the path of the configuration file
    Path,
    /// List the plugins declared in the configuration
    Plugins,
    /// Validate a configuration file
    Check {
        #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

pub struct ConfigPlugin {
    config: Config,
}

fn new_plugin(config: &Config) -> Box<dyn Plugin> {
    Box::new(ConfigPlugin {
        config: config.clone(),
    })
}

impl Plugin for ConfigPlugin {
    fn main(&mut self, args: &[String], out: &mut dyn Write) -> Result<()> {
        let Some(parsed) = parse_args::<ConfigArgs>(NAME, args, out)? else {
            return Ok(());
        };

        match parsed.command {
            ConfigCommand::Show { json } => {
                let rendered = if json {
                    let mut s = serde_json::to_string_pretty(&self.config)
                        .context("Failed to serialize configuration as JSON")?;
                    s.push('\n');
                    s
                } else {
                    serde_yaml::to_string(&self.config)
                        .context("Failed to serialize configuration as YAML")?
                };
                write!(out, "{rendered}")?;
            }
            ConfigCommand::Path => match &self.config.path {
                Some(path) => writeln!(out, "{}", path.display())?,
                None => writeln!(out, "(no configuration file; using defaults)")?,
            },
            ConfigCommand::Plugins => {
                for id in &self.config.plugins {
                    writeln!(out, "{id}")?;
                }
            }
            ConfigCommand::Check { file } => {
                let checked = Config::read(&file)?;
                writeln!(
                    out,
                    "Configuration '{}' is valid ({} plugin(s), master {}).",
                    file.display(),
                    checked.plugins.len(),
                    checked.master
                )?;
            }
        }
        Ok(())
    }

    fn autocomplete(&self, current_word: &str, args: &[String]) -> Result<Completion> {
        Ok(complete_from_command(
            &ConfigArgs::command(),
            current_word,
            args,
        ))
    }
}
