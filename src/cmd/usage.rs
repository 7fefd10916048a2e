//! Global usage and version text.

use crate::plugin::registry::CommandTable;

const USAGE_TEMPLATE: &str = "Mesos CLI

Usage:
  mesos (-h | --help)
  mesos --version
  mesos <command> [<args>...]

Options:
  -h --help     Show this screen.
  --version     Show version info.
  -v --verbose  Increase log verbosity (repeatable).
  -q --quiet    Only log errors.

Commands:
{commands}
See 'mesos help <command>' for more information on a specific command.
";

/// `Mesos <version> CLI`
pub fn version_line() -> String {
    format!("Mesos {} CLI", env!("CARGO_PKG_VERSION"))
}

/// Global usage with one line per registered command.
pub fn render(table: &CommandTable) -> String {
    USAGE_TEMPLATE.replace("{commands}", &format_commands_help(table))
}

/// `  <name><pad><short help>` per command, names aligned, sorted by name.
/// Empty table renders as an empty string.
pub fn format_commands_help(table: &CommandTable) -> String {
    if table.is_empty() {
        return String::new();
    }
    let width = table.names().map(str::len).max().unwrap_or(0);
    table
        .iter()
        .map(|d| format!("  {:<width$}  {}\n", d.name, d.short_help))
        .collect()
}
