mod cli;

use anyhow::Context;
use cimi_utils::exclusion::ExclusionSet;
use cimi_utils::probe::{Environment, ProbeRequest};
use cimi_utils::{document, error_table, negotiate, probe, reconcile};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CIMI_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::CopyField(cmd) => copy_field(cmd),
        cli::Command::CopyExtra(cmd) => copy_extra(cmd),
        cli::Command::HasExtra(cmd) => has_extra(cmd),
        cli::Command::Strip(cmd) => strip(cmd),
        cli::Command::Negotiate(cmd) => {
            println!("{}", negotiate::best_match(&cmd.accept));
            Ok(())
        }
        cli::Command::State(cmd) => {
            let kind: cimi_utils::state::ResourceKind = cmd.kind.into();
            println!("{}", kind.map_state(&cmd.state));
            Ok(())
        }
        cli::Command::Error(cmd) => error(cmd),
        cli::Command::Probe(cmd) => probe_resource(cmd),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(2);
    }
}

pub fn copy_field(cli: cli::CopyFieldCommand) -> anyhow::Result<()> {
    let mut target = document::load_file(&cli.target)?;
    let source = document::load_file(&cli.source)?;

    reconcile::copy_field(&mut target, &source, &cli.target_path, &cli.source_path);

    output(&cli.output, &target)
}

pub fn copy_extra(cli: cli::CopyExtraCommand) -> anyhow::Result<()> {
    let mut target = document::load_file(&cli.target)?;
    let source = document::load_file(&cli.source)?;
    let excluded = load_exclusions(&cli.exclude)?;

    reconcile::copy_extra(&mut target, &source, &excluded);

    output(&cli.output, &target)
}

pub fn has_extra(cli: cli::HasExtraCommand) -> anyhow::Result<()> {
    let source = document::load_file(&cli.source)?;
    let exclusions = load_exclusions(&cli.exclude)?;

    let found = reconcile::has_extra(&source, &exclusions);
    println!("{found}");
    if found {
        std::process::exit(1);
    }

    Ok(())
}

pub fn strip(cli: cli::StripCommand) -> anyhow::Result<()> {
    let mut document = document::load_file(&cli.document)?;
    for member in &cli.members {
        reconcile::strip_field(&mut document, member);
    }

    output(&cli.output, &document)
}

pub fn error(cli: cli::ErrorCommand) -> anyhow::Result<()> {
    let response = error_table::ErrorResponse::from(cli.kind);
    serde_json::to_writer_pretty(std::io::stdout(), &response)?;
    println!();
    Ok(())
}

pub fn probe_resource(cli: cli::ProbeCommand) -> anyhow::Result<()> {
    let mut environment = Environment::new(cli.scheme, cli.host, cli.port, cli.path);
    for (name, value) in cli.headers {
        environment = environment.with_header(name, value);
    }

    let request = ProbeRequest {
        method: cli.method,
        path: None,
        fetch_body: cli.fetch_body,
        query_string: cli.query,
        body: cli.body.map(String::into_bytes),
    };

    let outcome = probe::probe(&environment, &request)?;
    output(&cli.output, &outcome)
}

fn load_exclusions(path: &std::path::Path) -> anyhow::Result<ExclusionSet> {
    let document = document::load_file(path)?;
    ExclusionSet::from_document(&document)
        .with_context(|| format!("Invalid exclusion set {}", path.display()))
}

fn output(output: &cli::OutputArgs, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), value)?;
            println!();
        }
    };

    Ok(())
}
