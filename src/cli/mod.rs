// CLI module
// Public interface for the interactive REPL

mod repl;

pub use repl::Repl;
