use autodeploy_cli::{
    cli::{Cli, Commands},
    handlers,
};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    match run(cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> autodeploy_cli::Result<String> {
    match cli.command {
        Commands::Analyze { path, json } => {
            let config = handlers::resolve_config(cli.config.as_deref(), Some(&path))?;
            handlers::handle_analyze(&path, json, &config)
        }
        Commands::Plan {
            path,
            description,
            provider,
            deployment_type,
            json,
        } => {
            let config = handlers::resolve_config(cli.config.as_deref(), Some(&path))?;
            handlers::handle_plan(&path, &description, provider, deployment_type, json, &config)
        }
        Commands::Support {
            languages,
            frameworks,
        } => handlers::handle_support(languages, frameworks),
    }
}
