use podsmith::cli::commands::{CliArgs, Commands};
use podsmith::cli::handlers::{handle_archetypes, handle_batch, handle_predict};
use podsmith::util::logging::{self, parse_level, LoggingConfig};
use podsmith::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("podsmith v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Predict(predict_args) => handle_predict(predict_args).await,
        Commands::Batch(batch_args) => handle_batch(batch_args).await,
        Commands::Archetypes(archetypes_args) => handle_archetypes(archetypes_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let from_env = logging::config_from_env();
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        from_env.level
    };

    logging::init_logging(LoggingConfig { level, ..from_env });
}
