/*!
Top-level command dispatcher.

Flow for one invocation:

  main.rs      parse argv with `Cli` (clap), load config + command table
  router.rs    decide: __autocomplete__ | help | known plugin | fallback to global help
  autocomplete.rs  first word -> static names, later words -> the plugin's own completion
  usage.rs     global usage / version text built from the command table
  boundary.rs  map the dispatch result to an exit behaviour

Conventions:
  - Output goes to the `Write` handed to the router (stdout in `main`),
    never printed directly, so every path can be compared in tests.
  - Logging goes to stderr through `tracing` only.
*/

pub mod autocomplete;
pub mod boundary;
pub mod router;
pub mod usage;

/// Meta-command used by the shell completion layer.
pub const AUTOCOMPLETE_COMMAND: &str = "__autocomplete__";

/// Meta-command printing global or per-plugin help.
pub const HELP_COMMAND: &str = "help";

pub use boundary::Exit;
pub use router::Router;
