use anyhow::{Context, Result};
use clap::Parser;
use std::future::Future;
use std::io::{self, Write};

mod cmd;
mod config;
mod error;
mod plugin;
mod plugins;
mod utils;

use cmd::{Exit, Router};
use config::Config;
use error::CliError;

/// Mesos CLI - single entry point for pluggable cluster commands.
///
/// Layout:
///   mesos (-h | --help)
///   mesos --version
///   mesos <command> [<args>...]
///
/// Everything after `<command>` is handed to the plugin untouched
/// (options-first grammar), so `mesos agent --help` is the agent
/// plugin's help, not ours.
///
/// Meta-commands:
///   help [<command>]                    global help, or the plugin's own `--help`
///   __autocomplete__ <word> [<args>...] completion protocol for shell scripts:
///                                       line 1 = mode, line 2 = candidates
///
/// Global flags / env:
///   -v / -vv           Increase log verbosity (stderr)
///   -q / --quiet       Errors only
///   MESOS_CLI_CONFIG   Configuration file (default ~/.mesos/config.yaml)
///   RUST_LOG           Overrides the log filter
///
/// Examples:
///   mesos help config
///   mesos config show --json
///   mesos master endpoint /master/state
///   mesos __autocomplete__ co
#[derive(Parser, Debug)]
#[command(
    name = "mesos",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Show global usage
    #[arg(short, long)]
    help: bool,

    /// Show version info
    #[arg(long)]
    version: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Command name followed by its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    let outcome = run_interruptible(move || run(cli), tokio::signal::ctrl_c());
    match cmd::boundary::classify(outcome) {
        Exit::Success | Exit::Interrupted => Ok(()),
        Exit::Failure(line) => {
            eprintln!("{line}");
            std::process::exit(Exit::FAILURE_CODE);
        }
        Exit::Usage(err) => err.exit(),
        Exit::Uncaught(err) => Err(err),
    }
}

/// Run `dispatch` on a blocking thread while watching `interrupt`.
///
/// `interrupt` resolving to `Ok` aborts the wait with `CliError::Interrupted`.
/// An `Err` (the handler could not be registered) disables the watch.
fn run_interruptible<D, I>(dispatch: D, interrupt: I) -> Result<()>
where
    D: FnOnce() -> Result<()> + Send + 'static,
    I: Future<Output = io::Result<()>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let result = rt.block_on(async move {
        let dispatch = tokio::task::spawn_blocking(dispatch);
        tokio::select! {
            joined = dispatch => match joined {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => Err(e).context("Dispatch task failed"),
            },
            Ok(()) = interrupt => Err(CliError::Interrupted.into()),
        }
    });

    // An interrupted plugin may still be running; do not wait for it.
    rt.shutdown_background();
    result
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let table = plugin::registry::load(&config.plugins, &config.namespace, &plugins::catalog())?;
    tracing::debug!(
        config = ?config.path,
        commands = table.len(),
        "loaded plugins"
    );

    let router = Router::new(&config, &table);
    let mut out = io::stdout().lock();
    router.run(cli, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    /// A dispatch that blocks until released, then writes to `out`.
    fn blocked_dispatch(
        out: Arc<Mutex<Vec<u8>>>,
    ) -> (mpsc::Sender<()>, impl FnOnce() -> Result<()> + Send + 'static) {
        let (release, wait) = mpsc::channel::<()>();
        let dispatch = move || {
            let _ = wait.recv();
            out.lock().unwrap().extend_from_slice(b"late output\n");
            Ok(())
        };
        (release, dispatch)
    }

    #[test]
    fn interrupt_during_blocking_dispatch_exits_silently() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let (release, dispatch) = blocked_dispatch(Arc::clone(&out));

        let outcome = run_interruptible(dispatch, async { io::Result::Ok(()) });

        assert!(matches!(cmd::boundary::classify(outcome), Exit::Interrupted));
        assert!(out.lock().unwrap().is_empty());
        drop(release);
    }

    #[test]
    fn finished_dispatch_wins_over_pending_interrupt() {
        let outcome = run_interruptible(|| Ok(()), std::future::pending());
        assert!(matches!(cmd::boundary::classify(outcome), Exit::Success));

        let outcome = run_interruptible(
            || Err(CliError::msg("not found").into()),
            std::future::pending(),
        );
        match cmd::boundary::classify(outcome) {
            Exit::Failure(line) => assert_eq!(line, "Error: not found."),
            other => panic!("unexpected exit: {other:?}"),
        }
    }

    #[test]
    fn failed_signal_registration_does_not_interrupt() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let (release, dispatch) = blocked_dispatch(Arc::clone(&out));
        release.send(()).unwrap();

        let outcome = run_interruptible(dispatch, async {
            io::Result::Err(io::Error::other("no signal handler"))
        });

        assert!(matches!(cmd::boundary::classify(outcome), Exit::Success));
        assert_eq!(out.lock().unwrap().as_slice(), b"late output\n");
    }
}
