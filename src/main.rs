use clap::{Parser, Subcommand};
use doc_archive::{config, generate::GenerationStamp, output, pipeline};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "doc-archive")]
#[command(about = "Static HTML browser for a scanned-document archive")]
#[command(long_about = "\
Static HTML browser for a scanned-document archive

Every stored document has a JSON metadata record next to it. A build reads
all records, groups the documents by year and by keyword, and writes one
HTML page per year and per keyword, plus two overview pages.

Archive structure:

  archive/
  ├── semaphore                  # Build trigger, removed after a build
  ├── 2023/
  │   ├── 20230115A.json         # {\"id\", \"title\", \"storage_location\", \"keywords\"}
  │   └── 20230115A.pdf
  └── .inbox/                    # Any depth; every *.json is a record

Generated site:

  public/
  ├── all_years.html             # Years, newest first
  ├── year_2023.html             # Documents of one year, highest id first
  ├── all_keywords.html          # Keywords, alphabetical
  ├── keyword_invoice.html       # Documents with one keyword
  ├── index.html -> year_2023.html
  └── documents -> archive/

A build only runs while the trigger file exists; run it from cron and touch
the trigger whenever a document is added. Use --force to build regardless.

Run 'doc-archive gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Archive config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Log each build step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the site if the trigger file is present
    Build {
        /// Build even without a trigger file
        #[arg(long)]
        force: bool,
        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate templates and metadata without writing anything
    Check {
        /// Print the scanned documents as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Command::Build { force, json } => {
            let config = config::load_config(&cli.config)?;
            match pipeline::run(&config, GenerationStamp::capture(), force)? {
                pipeline::Outcome::Built(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                pipeline::Outcome::Built(report) => output::print_build_output(&report),
                pipeline::Outcome::NothingToDo { trigger } => {
                    println!("No trigger at {}, nothing to do", trigger.display());
                }
            }
        }
        Command::Check { json: true } => {
            let config = config::load_config(&cli.config)?;
            let inventory = pipeline::check(&config)?;
            println!("{}", serde_json::to_string_pretty(&inventory.manifest)?);
        }
        Command::Check { json: false } => {
            let config = config::load_config(&cli.config)?;
            println!("==> Checking {}", config.archive_dir.display());
            let inventory = pipeline::check(&config)?;
            output::print_check_output(&inventory.manifest.documents, &inventory.index);
            println!("==> Archive is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
