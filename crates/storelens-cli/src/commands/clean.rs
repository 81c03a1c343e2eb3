//! Clean command - clean a raw workbook and write the cleaned sheets.

use std::path::PathBuf;

use colored::Colorize;
use storelens::Pipeline;

use crate::cli::ConfigArgs;

pub fn run(
    args: ConfigArgs,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(&args)?;
    if let Some(input) = input {
        config.input = input;
    }
    if let Some(output) = output {
        config.cleaned_dir = output;
    }

    if !config.input.exists() {
        return Err(format!("Input not found: {}", config.input.display()).into());
    }

    if !args.json {
        println!(
            "{} {}",
            "Cleaning".cyan().bold(),
            config.input.display().to_string().white()
        );
    }

    let pipeline = Pipeline::new(config);
    let summary = pipeline.clean()?;

    if args.json {
        let status = serde_json::json!({
            "source": summary.source,
            "report": summary.report,
            "files": summary.files,
            "manifest": summary.manifest,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    for sheet in &summary.report.sheets {
        let label = match sheet.kind {
            Some(kind) => kind.to_string(),
            None => "no rules".dimmed().to_string(),
        };
        println!(
            "  {:12} {:>7} rows  {} duplicates, {} invalid, {} filled  ({})",
            sheet.sheet,
            sheet.rows_written.to_string().white().bold(),
            sheet.duplicates_removed.to_string().yellow(),
            sheet.invalid_rows_dropped.to_string().red(),
            sheet.values_filled().to_string().blue(),
            label
        );

        if verbose {
            for fill in &sheet.fills {
                println!(
                    "      {:20} {:>5} filled with {}",
                    fill.column, fill.filled, fill.fill_value
                );
            }
        }
    }

    println!();
    println!(
        "{} {} rows kept, {} removed",
        "Cleaned".green().bold(),
        summary.report.total_rows().to_string().white().bold(),
        summary.report.total_rows_removed()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        pipeline.config().cleaned_dir.display().to_string().white()
    );
    println!(
        "Run {} to compute the metrics",
        "storelens analyze".cyan().bold()
    );

    Ok(())
}
