//! Process boundary: dispatch result -> exit behaviour.
//!
//! Only `CliError` is rendered for the user (`Error: <message>.`, exit 1).
//! User aborts exit quietly; clap usage errors let clap print and exit;
//! everything else is returned from `main` untouched.

use anyhow::Error;
use std::io;

use crate::error::CliError;

#[derive(Debug)]
pub enum Exit {
    Success,
    /// Aborted by the user; no output.
    Interrupted,
    /// Rendered `Error: ...` line for stderr.
    Failure(String),
    /// Argument grammar error; clap renders and exits.
    Usage(clap::Error),
    /// Unexpected failure, surfaced as-is.
    Uncaught(Error),
}

impl Exit {
    /// Non-zero status used for `Failure`.
    pub const FAILURE_CODE: i32 = 1;
}

pub fn classify(result: anyhow::Result<()>) -> Exit {
    let Err(err) = result else {
        return Exit::Success;
    };

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return match cli_err {
            CliError::Interrupted => Exit::Interrupted,
            other => Exit::Failure(render_error(other)),
        };
    }
    if is_interrupt(&err) {
        return Exit::Interrupted;
    }
    match err.downcast::<clap::Error>() {
        Ok(usage) => Exit::Usage(usage),
        Err(err) => Exit::Uncaught(err),
    }
}

pub fn render_error(err: &CliError) -> String {
    format!("Error: {err}.")
}

fn is_interrupt(err: &Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
    })
}
