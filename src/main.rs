use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use shp_dedup::prelude::*;
use shp_dedup::reporting::console::ConsoleProgress;

#[derive(Parser)]
#[command(name = "shp_dedup")]
#[command(about = "Export shapefile records duplicated on selected attribute columns", long_about = None)]
struct Cli {
    /// Directory holding the source shapefile (the first .shp found is used)
    source: PathBuf,

    /// Directory to write duplicates.shp into (omit to only count duplicates)
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Attribute columns that define a duplicate (repeatable or comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Column every source shapefile must contain
    #[arg(long, default_value = DEFAULT_REQUIRED_FIELD)]
    required_field: String,

    /// Print the attribute columns of the source shapefile and exit
    #[arg(long)]
    list_columns: bool,

    /// Print --list-columns output as JSON
    #[arg(long, requires = "list_columns")]
    json: bool,

    /// Write a duplicate-group report to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if cli.list_columns {
        return list_columns(&cli);
    }

    let request = ExportRequest {
        source_dir: cli.source.clone(),
        destination_dir: cli.destination.clone(),
        selected_columns: cli.columns.clone(),
    };
    let exporter = DuplicateExporter::new().with_required_field(cli.required_field.clone());

    let progress = ConsoleProgress::new(cli.batch);
    let result = exporter.run(&request, &progress);
    progress.finish();

    let outcome = match result {
        Ok(outcome) => outcome,
        // already reported through the sink
        Err(_) => return Ok(ExitCode::FAILURE),
    };

    println!("==================================================");
    println!("DUPLICATE DETECTION COMPLETE");
    println!("==================================================");
    println!("Source: {}", outcome.source_file.display());
    println!("Records: {}", outcome.total_records);
    println!(
        "Duplicates: {} in {} group(s)",
        outcome.duplicate_count(),
        outcome.groups.len()
    );

    if let Some(ref report_path) = cli.report {
        write_report(report_path, &outcome)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("Detailed report saved to: {:?}", report_path);
    }

    Ok(ExitCode::SUCCESS)
}

fn list_columns(cli: &Cli) -> Result<ExitCode> {
    let columns = match discover_columns(&cli.source) {
        Ok(columns) => columns,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&columns).context("Failed to serialize columns")?;
        println!("{json}");
    } else {
        for column in &columns {
            println!("{}\t{}", column.name, column.field_type);
        }
    }

    Ok(ExitCode::SUCCESS)
}
