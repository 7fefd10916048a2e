/*!
`master` plugin: resolve addresses on the configured Mesos master.

  mesos master url               configured master base URL
  mesos master endpoint <PATH>   absolute URL of a master HTTP endpoint
*/

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::io::Write;
use url::Url;

use crate::config::Config;
use crate::error::CliError;
use crate::plugin::base::{complete_from_command, parse_args};
use crate::plugin::{Completion, Plugin, PluginManifest};

pub const NAME: &str = "master";
pub const SHORT_HELP: &str = "Locate the Mesos master and its endpoints";

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
struct MasterArgs {
    #[command(subcommand)]
    command: MasterCommand,
}

#[derive(Subcommand, Debug)]
enum MasterCommand {
    /// Print the master base URL
    Url,
    /// Print the absolute URL of a master endpoint (e.g. `state`, `/master/tasks`)
    Endpoint {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

pub struct MasterPlugin {
    master: Url,
}

fn new_plugin(config: &Config) -> Box<dyn Plugin> {
    Box::new(MasterPlugin {
        master: config.master.clone(),
    })
}

impl MasterPlugin {
    fn endpoint(&self, path: &str) -> Result<Url, CliError> {
        let relative = path.trim().trim_start_matches('/');
        if relative.is_empty() {
            return Err(CliError::msg("endpoint path is empty"));
        }
        self.master
            .join(relative)
            .map_err(|e| CliError::msg(format!("invalid endpoint '{path}': {e}")))
    }
}

impl Plugin for MasterPlugin {
    fn main(&mut self, args: &[String], out: &mut dyn Write) -> Result<()> {
        let Some(parsed) = parse_args::<MasterArgs>(NAME, args, out)? else {
            return Ok(());
        };
        match parsed.command {
            MasterCommand::Url => writeln!(out, "{}", self.master)?,
            MasterCommand::Endpoint { path } => writeln!(out, "{}", self.endpoint(&path)?)?,
        }
        Ok(())
    }

    fn autocomplete(&self, current_word: &str, args: &[String]) -> Result<Completion> {
        Ok(complete_from_command(
            &MasterArgs::command(),
            current_word,
            args,
        ))
    }
}
