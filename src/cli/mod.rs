pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{ArchetypesArgs, BatchArgs, CliArgs, Commands, OutputFormatArg, PredictArgs};
pub use handlers::{handle_archetypes, handle_batch, handle_predict};
pub use output::{OutputFormat, OutputFormatter};
