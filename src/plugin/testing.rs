//! Test-only plugins and helpers for exercising the dispatcher.

use anyhow::anyhow;
use std::io::{self, Write};

use super::base::filter_prefix;
use super::registry::{self, CommandTable, PluginCatalog};
use super::{Completion, CompletionMode, Plugin, PluginManifest};
use crate::config::Config;
use crate::error::CliError;

pub const NAMESPACE: &str = "plugins";

static TEST_PLUGINS: &[PluginManifest] = &[
    PluginManifest {
        id: "echo",
        name: "echo",
        short_help: "Echo arguments back",
        factory: echo,
    },
    PluginManifest {
        id: "broken",
        name: "broken",
        short_help: "Always fails",
        factory: broken,
    },
    PluginManifest {
        id: "abort",
        name: "abort",
        short_help: "Behaves like a user abort",
        factory: abort,
    },
    PluginManifest {
        id: "echo-again",
        name: "echo",
        short_help: "Second plugin claiming echo",
        factory: echo,
    },
    PluginManifest {
        id: "shadow-help",
        name: "help",
        short_help: "Tries to shadow help",
        factory: echo,
    },
];

pub fn catalog() -> PluginCatalog {
    PluginCatalog::new(NAMESPACE, TEST_PLUGINS)
}

pub fn config() -> Config {
    Config::load_from(None).expect("default config")
}

pub fn table(ids: &[&str]) -> CommandTable {
    let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    registry::load(&ids, NAMESPACE, &catalog()).expect("test plugins load")
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Prints its arguments, or a usage line when asked for help.
struct Echo;

fn echo(_: &Config) -> Box<dyn Plugin> {
    Box::new(Echo)
}

impl Plugin for Echo {
    fn main(&mut self, args: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
        if args.iter().any(|a| a == "--help") {
            let rest: Vec<&str> = args
                .iter()
                .map(String::as_str)
                .filter(|a| *a != "--help")
                .collect();
            writeln!(out, "Usage: mesos echo [<words>...] (help for: {})", rest.join(" "))?;
        } else {
            writeln!(out, "echo: {}", args.join(" "))?;
        }
        Ok(())
    }

    fn autocomplete(&self, current_word: &str, args: &[String]) -> anyhow::Result<Completion> {
        let mut words = vec!["alpha", "beta", "bravo"];
        words.retain(|w| !args.iter().any(|a| a == w));
        Ok(Completion::new(
            CompletionMode::Custom("words".into()),
            filter_prefix(&words, current_word),
        ))
    }
}

/// Fails on every path.
struct Broken;

fn broken(_: &Config) -> Box<dyn Plugin> {
    Box::new(Broken)
}

impl Plugin for Broken {
    fn main(&mut self, args: &[String], _out: &mut dyn Write) -> anyhow::Result<()> {
        match args.first().map(String::as_str) {
            Some("crash") => Err(anyhow!("unexpected internal state")),
            Some("panic") => panic!("broken plugin panicked"),
            _ => Err(CliError::msg("not found").into()),
        }
    }

    fn autocomplete(&self, current_word: &str, _args: &[String]) -> anyhow::Result<Completion> {
        if current_word == "panic" {
            panic!("broken plugin panicked while completing");
        }
        Err(anyhow!("completion backend unavailable"))
    }
}

/// Reports an interrupted run.
struct Abort;

fn abort(_: &Config) -> Box<dyn Plugin> {
    Box::new(Abort)
}

impl Plugin for Abort {
    fn main(&mut self, args: &[String], _out: &mut dyn Write) -> anyhow::Result<()> {
        if args.first().is_some_and(|a| a == "io") {
            return Err(io::Error::from(io::ErrorKind::Interrupted).into());
        }
        Err(CliError::Interrupted.into())
    }

    fn autocomplete(&self, _current_word: &str, _args: &[String]) -> anyhow::Result<Completion> {
        Ok(Completion::empty())
    }
}
