//! Completion resolution for the `__autocomplete__` meta-command.
//!
//! The first word completes against the command table plus `help`; every
//! later word is delegated to the plugin named by the first one. A leading
//! `help` is skipped so `mesos help <partial>` completes like `mesos <partial>`.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use super::HELP_COMMAND;
use crate::config::Config;
use crate::error::CompletionError;
use crate::plugin::Completion;
use crate::plugin::base::filter_prefix;
use crate::plugin::registry::CommandTable;

/// Resolve completions for `current_word` given the words before it.
pub fn resolve(
    config: &Config,
    table: &CommandTable,
    current_word: &str,
    argv: &[String],
) -> Result<Completion, CompletionError> {
    let argv = match argv.split_first() {
        Some((first, rest)) if first == HELP_COMMAND => rest,
        _ => argv,
    };

    let Some((name, rest)) = argv.split_first() else {
        let mut words: Vec<&str> = table.names().collect();
        words.push(HELP_COMMAND);
        return Ok(Completion::words(filter_prefix(&words, current_word)));
    };

    let descriptor = table
        .get(name)
        .ok_or_else(|| CompletionError::UnknownPlugin(name.clone()))?;

    // Plugin code is outside our control; a panic there must not reach the shell.
    let outcome = catch_silently(|| {
        descriptor
            .instantiate(config)
            .autocomplete(current_word, rest)
    });
    match outcome {
        Ok(Ok(completion)) => Ok(completion),
        Ok(Err(source)) => Err(CompletionError::Plugin {
            name: name.clone(),
            source,
        }),
        Err(_) => Err(CompletionError::PluginPanicked(name.clone())),
    }
}

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// `catch_unwind` that also keeps the panic message and backtrace off
/// stderr. The hook is wrapped once per process; only the calling thread
/// is silenced.
fn catch_silently<T>(f: impl FnOnce() -> T) -> std::thread::Result<T> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });

    SILENCED.with(|s| s.set(true));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|s| s.set(false));
    outcome
}
