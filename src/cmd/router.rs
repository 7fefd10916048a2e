//! Top-level routing.
//!
//! One parsed invocation becomes exactly one action, checked in this order:
//!   1. `__autocomplete__ <word> [args...]`  completion protocol
//!   2. `help [<command> [args...]]`         plugin help, else global help
//!   3. `<command> [args...]`                run the plugin
//!   4. anything else                        global help
//!
//! Fallbacks re-enter the router with the literal `--help`, which always
//! resolves to global help, so a dispatch takes at most two passes.

use anyhow::{Result, bail};
use clap::Parser;
use std::io::Write;
use tracing::debug;

use super::{AUTOCOMPLETE_COMMAND, HELP_COMMAND, autocomplete, usage};
use crate::Cli;
use crate::config::Config;
use crate::error::CliError;
use crate::plugin::Completion;
use crate::plugin::registry::CommandTable;

const MAX_PASSES: usize = 2;

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Autocomplete {
        current_word: String,
        args: Vec<String>,
    },
    PluginHelp {
        name: String,
        args: Vec<String>,
    },
    Run {
        name: String,
        args: Vec<String>,
    },
    GlobalHelp,
    Version,
}

#[derive(Debug, PartialEq, Eq)]
enum Transition {
    Execute(Action),
    Reenter(Vec<String>),
}

/// Routes invocations to meta-commands and plugins.
pub struct Router<'a> {
    config: &'a Config,
    table: &'a CommandTable,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a Config, table: &'a CommandTable) -> Self {
        Self { config, table }
    }

    /// Parse `argv` (without program name) and dispatch it.
    #[cfg(test)]
    pub fn dispatch(&self, argv: &[String], out: &mut dyn Write) -> Result<()> {
        self.run(parse_argv(argv)?, out)
    }

    /// Dispatch an already-parsed invocation.
    pub fn run(&self, mut cli: Cli, out: &mut dyn Write) -> Result<()> {
        for _ in 0..MAX_PASSES {
            match self.decide(cli) {
                Transition::Execute(action) => return self.execute(action, out),
                Transition::Reenter(argv) => {
                    debug!(?argv, "no command matched; showing global help");
                    cli = parse_argv(&argv)?;
                }
            }
        }
        bail!("command routing did not settle after {MAX_PASSES} passes")
    }

    fn decide(&self, cli: Cli) -> Transition {
        if cli.help {
            return Transition::Execute(Action::GlobalHelp);
        }
        if cli.version {
            return Transition::Execute(Action::Version);
        }

        let mut words = cli.command.into_iter();
        let Some(command) = words.next() else {
            return global_help();
        };
        let args: Vec<String> = words.collect();

        match command.as_str() {
            AUTOCOMPLETE_COMMAND => {
                let mut args = args.into_iter();
                let current_word = args.next().unwrap_or_default();
                Transition::Execute(Action::Autocomplete {
                    current_word,
                    args: args.collect(),
                })
            }
            HELP_COMMAND => match args.split_first() {
                Some((name, rest)) if self.table.contains(name) => {
                    Transition::Execute(Action::PluginHelp {
                        name: name.clone(),
                        args: rest.to_vec(),
                    })
                }
                _ => global_help(),
            },
            name if self.table.contains(name) => Transition::Execute(Action::Run {
                name: command.clone(),
                args,
            }),
            _ => global_help(),
        }
    }

    fn execute(&self, action: Action, out: &mut dyn Write) -> Result<()> {
        match action {
            Action::GlobalHelp => write!(out, "{}", usage::render(self.table))?,
            Action::Version => writeln!(out, "{}", usage::version_line())?,
            Action::Autocomplete { current_word, args } => {
                let completion =
                    autocomplete::resolve(self.config, self.table, &current_word, &args)
                        .unwrap_or_else(|err| {
                            debug!(error = %err, "completion failed; offering nothing");
                            Completion::empty()
                        });
                write!(out, "{}", completion.render())?;
            }
            Action::PluginHelp { name, mut args } => {
                args.push("--help".to_string());
                self.run_plugin(&name, &args, out)?;
            }
            Action::Run { name, args } => self.run_plugin(&name, &args, out)?,
        }
        Ok(())
    }

    fn run_plugin(&self, name: &str, args: &[String], out: &mut dyn Write) -> Result<()> {
        let descriptor = self
            .table
            .get(name)
            .ok_or_else(|| CliError::msg(format!("unknown command '{name}'")))?;
        debug!(command = name, source = %descriptor.source, ?args, "dispatching to plugin");
        let mut handler = descriptor.instantiate(self.config);
        handler.main(args, out)
    }
}

fn global_help() -> Transition {
    Transition::Reenter(vec!["--help".to_string()])
}

fn parse_argv(argv: &[String]) -> Result<Cli> {
    let full = std::iter::once("mesos").chain(argv.iter().map(String::as_str));
    Ok(Cli::try_parse_from(full)?)
}
