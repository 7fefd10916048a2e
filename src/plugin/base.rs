/*!
Shared behaviour for plugins built on `clap`.

  - parse_args             plugin argv -> parsed struct, rendering `--help` into the output
  - complete_from_command  completion derived from the plugin's clap `Command`
  - filter_prefix          order-preserving prefix filter (also used for top-level names)

Parse errors other than help requests are returned as `clap::Error`; the
process boundary lets clap print its own diagnostic and exit.
*/

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, Command, Parser, ValueHint};
use std::io::Write;

use super::{Completion, CompletionMode};

/// Parse `args` for the plugin `name`.
///
/// Returns `Ok(None)` when clap rendered help instead (`--help`, or no
/// subcommand given); the help text is written to `out`.
pub fn parse_args<P: Parser>(
    name: &str,
    args: &[String],
    out: &mut dyn Write,
) -> Result<Option<P>> {
    let argv = std::iter::once(format!("mesos {name}")).chain(args.iter().cloned());
    match P::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            write!(out, "{}", err.render())?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

/// Keep the words starting with `current_word`, in their original order.
pub fn filter_prefix<S: AsRef<str>>(words: &[S], current_word: &str) -> Vec<String> {
    words
        .iter()
        .map(|w| w.as_ref())
        .filter(|w| w.starts_with(current_word))
        .map(str::to_string)
        .collect()
}

/// Complete against a clap command tree.
///
/// `args` are the words already typed after the plugin name:
///   - none: subcommand names (or the plugin's own flags for `-` words)
///   - `<sub> ...`: the subcommand's flags for `-` words, otherwise the next
///     positional's possible values, or `file` mode for path positionals
pub fn complete_from_command(cmd: &Command, current_word: &str, args: &[String]) -> Completion {
    let mut cmd = cmd.clone();
    cmd.build();

    let Some((sub_name, rest)) = args.split_first() else {
        if current_word.starts_with('-') {
            return Completion::words(filter_prefix(&long_flags(&cmd), current_word));
        }
        let names: Vec<&str> = cmd
            .get_subcommands()
            .filter(|s| !s.is_hide_set())
            .map(Command::get_name)
            .collect();
        return Completion::words(filter_prefix(&names, current_word));
    };

    let Some(sub) = cmd.find_subcommand(sub_name) else {
        return Completion::empty();
    };
    if current_word.starts_with('-') {
        return Completion::words(filter_prefix(&long_flags(sub), current_word));
    }

    let given = rest.iter().filter(|a| !a.starts_with('-')).count();
    match sub.get_positionals().nth(given) {
        Some(arg) if is_path_arg(arg) => Completion::new(CompletionMode::File, Vec::new()),
        Some(arg) => {
            let values: Vec<String> = arg
                .get_possible_values()
                .iter()
                .filter(|v| !v.is_hide_set())
                .map(|v| v.get_name().to_string())
                .collect();
            Completion::words(filter_prefix(&values, current_word))
        }
        None => Completion::empty(),
    }
}

fn long_flags(cmd: &Command) -> Vec<String> {
    cmd.get_arguments()
        .filter(|a| !a.is_hide_set())
        .filter_map(Arg::get_long)
        .map(|long| format!("--{long}"))
        .collect()
}

fn is_path_arg(arg: &Arg) -> bool {
    matches!(
        arg.get_value_hint(),
        ValueHint::AnyPath | ValueHint::FilePath | ValueHint::DirPath
    )
}
