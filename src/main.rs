use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::error;

use fifa_ranking_scraper::config::Config;
use fifa_ranking_scraper::error::ScrapeError;
use fifa_ranking_scraper::fetch::HttpPageFetcher;
use fifa_ranking_scraper::normalize::{default_rules, rules_to_toml};
use fifa_ranking_scraper::types::RunSummary;
use fifa_ranking_scraper::{logging, pipeline};

#[derive(Parser)]
#[command(name = "fifa_ranking_scraper")]
#[command(about = "Scrapes the FIFA world-ranking archive into one consolidated CSV dataset")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every historical snapshot and write the assembled dataset
    Scrape {
        /// Path to a TOML config file (defaults to ./config.toml when present)
        #[arg(long)]
        config: Option<String>,
        /// Override the maximum number of in-flight requests
        #[arg(long)]
        max_concurrent: Option<usize>,
        /// Override the output directory
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Print the built-in identity-correction rules as TOML
    PrintRules,
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Scrape results:");
    println!("   Snapshots requested: {}", summary.requested);
    println!("   Successfully parsed: {}", summary.succeeded);
    println!("   Failed: {}", summary.failed.len());
    println!("   Rows dropped: {}", summary.skipped_rows);
    if let Some(file) = &summary.output_file {
        println!("   Output file: {}", file);
    }

    if !summary.failed.is_empty() {
        println!("\n⚠️  Failed snapshots:");
        for failure in &summary.failed {
            println!(
                "   - {} ({}): {} [{}]",
                failure.snapshot_id,
                failure.date,
                failure.error,
                failure.error.kind()
            );
        }
    }

    if !summary.warnings.is_empty() {
        println!("\n⚠️  Consistency warnings:");
        for warning in &summary.warnings {
            println!("   - {}", warning);
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            config,
            max_concurrent,
            output_dir,
        } => {
            let mut config = match Config::load(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    error!("Failed to load configuration: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(2);
                }
            };
            if let Some(n) = max_concurrent {
                config.archive.max_concurrent = n;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }

            println!("🔄 Scraping the ranking archive...");
            let source = Arc::new(HttpPageFetcher::new(&config.archive));

            match pipeline::run(source, &config).await {
                Ok(summary) => {
                    print_summary(&summary);
                    println!("\n✅ Done");
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    eprintln!("❌ {}", e);
                    if e.is_schema_change() {
                        eprintln!(
                            "The archive's page structure has changed and the scraper \
                             can no longer read it. Please report this issue."
                        );
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::PrintRules => match rules_to_toml(&default_rules()) {
            Ok(toml_text) => println!("{toml_text}"),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
    }
}
