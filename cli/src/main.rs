use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use scriptgen::{generate_network, generate_records, GenError, RunSummary, Settings};

#[derive(Parser)]
#[command(name = "sgen")]
#[command(about = "Generate C# protocol and data-center classes from decompiled client scripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder holding the decompiled `scripts/` tree [default: ./Input]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Folder receiving the generated sources, replaced on every run [default: ./Output]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON settings overriding the built-in namespaces, layout and exemptions
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log parser decisions as well
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Generate messages, types and enums
    Network,

    /// Generate data-center record classes
    Datacenter,
}

/// Asks until a valid choice is typed. End of input means no choice.
fn prompt() -> io::Result<Option<Commands>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("What to update ?");
        println!("1 : network");
        println!("2 : datacenter");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };
        match line.trim() {
            "1" => return Ok(Some(Commands::Network)),
            "2" => return Ok(Some(Commands::Datacenter)),
            _ => println!("Wrong number"),
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, GenError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_json(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    if let Some(input) = &cli.input {
        settings.input = input.clone();
    }
    if let Some(output) = &cli.output {
        settings.output = output.clone();
    }
    Ok(settings)
}

fn report(summary: &RunSummary) {
    info!(
        "Done: {} file(s) generated, {} skipped",
        summary.generated(),
        summary.skipped()
    );
}

fn main() -> Result<(), GenError> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = load_settings(&cli)?;

    let command = match cli.command {
        Some(command) => command,
        None => match prompt()? {
            Some(command) => command,
            None => return Ok(()),
        },
    };

    let summary = match command {
        Commands::Network => generate_network(&settings)?,
        Commands::Datacenter => generate_records(&settings)?,
    };
    report(&summary);
    Ok(())
}
