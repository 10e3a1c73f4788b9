use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Classifies repositories and synthesizes deployment manifests
#[derive(Parser, Debug)]
#[command(
    name = "podsmith",
    about = "Classifies repositories and synthesizes deployment manifests",
    version,
    author,
    long_about = "podsmith inspects a repository's layout, decides which application \
                  archetype it is, and generates a Deployment, Service, Route, Dockerfile \
                  and CI workflow for it. Repositories are read from GitHub or from a \
                  local checkout."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze one repository and synthesize its deployment config",
        long_about = "Analyzes a repository and prints the analysis, generated manifests \
                      and recommendations.\n\n\
                      Examples:\n  \
                      podsmith predict acme/shop\n  \
                      podsmith predict https://github.com/acme/shop --namespace web --format yaml\n  \
                      podsmith predict acme/shop --local ./shop --deploy --manifest-dir ./out"
    )]
    Predict(PredictArgs),

    #[command(
        about = "Process an instances envelope from a JSON file",
        long_about = "Reads {\"instances\": [...]} from a file (or '-' for stdin) and prints \
                      {\"predictions\": [...]}.\n\n\
                      Examples:\n  \
                      podsmith batch requests.json\n  \
                      cat requests.json | podsmith batch -"
    )]
    Batch(BatchArgs),

    #[command(about = "List registered archetypes")]
    Archetypes(ArchetypesArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    #[arg(
        value_name = "REPOSITORY",
        help = "Repository URL or owner/name identifier"
    )]
    pub repository: String,

    #[arg(
        long,
        value_name = "PATH",
        help = "Read repository contents from a local checkout instead of GitHub"
    )]
    pub local: Option<PathBuf>,

    #[arg(short = 'b', long, default_value = "main", help = "Branch to analyze")]
    pub branch: String,

    #[arg(
        short = 'n',
        long,
        default_value = "default",
        help = "Target namespace"
    )]
    pub namespace: String,

    #[arg(
        long,
        default_value = "auto",
        value_name = "KIND",
        help = "Archetype to synthesize for ('auto' keeps the classified one)"
    )]
    pub deployment_type: String,

    #[arg(long, help = "Apply the generated manifests after synthesis")]
    pub deploy: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Apply manifests by writing them under DIR/<namespace>/"
    )]
    pub manifest_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    #[arg(value_name = "REQUEST_FILE", help = "JSON envelope file, or '-' for stdin")]
    pub request_file: PathBuf,

    #[arg(
        long,
        value_name = "PATH",
        help = "Read every instance from this local checkout instead of GitHub"
    )]
    pub local: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Apply manifests by writing them under DIR/<namespace>/"
    )]
    pub manifest_dir: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ArchetypesArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
