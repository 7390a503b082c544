use anyhow::Result;
use clap::Parser;
use layermap::cli::{Cli, Commands};
use layermap::commands::AnalyzeConfig;
use layermap::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            graph,
            config,
            format,
            output,
            layers,
            verbosity,
        } => {
            init_tracing(verbosity);
            layermap::commands::handle_analyze(AnalyzeConfig {
                graph,
                config,
                format: format.map(Into::into),
                output,
                layers,
            })
        }
        Commands::Init { force } => {
            init_tracing(0);
            layermap::commands::init_config(force)
        }
    }
}
