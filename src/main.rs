use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resume::Config;

#[derive(Parser)]
#[command(name = "resume-tex")]
#[command(about = "Fill a LaTeX resume template from YAML data", version)]
struct Cli {
    /// Config file with default paths
    #[arg(short, long, default_value = "resume.toml")]
    config: PathBuf,

    /// Personal data YAML file
    #[arg(long)]
    data: Option<PathBuf>,

    /// Project data YAML file
    #[arg(long)]
    projects: Option<PathBuf>,

    /// LaTeX template to fill
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Output file (defaults to overwriting the template)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the filled document instead of writing it
    #[arg(long, conflicts_with = "output")]
    stdout: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut paths = Config::load(&cli.config)?.paths;
    if let Some(data) = cli.data {
        paths.data = data;
    }
    if let Some(projects) = cli.projects {
        paths.projects = projects;
    }
    if let Some(template) = cli.template {
        paths.template = template;
    }
    if let Some(output) = cli.output {
        paths.output = Some(output);
    }

    let document = resume::generate(&paths).context("Failed to generate resume")?;

    if cli.stdout {
        print!("{document}");
        return Ok(());
    }

    let output = paths.output();
    resume::atomic_write(output, &document)?;
    info!(path = %output.display(), "wrote document");
    println!("Wrote {}", output.display());
    Ok(())
}
