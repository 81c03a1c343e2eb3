//! Analyze command - compute the metrics from a cleaned workbook.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use storelens::{OutputFormat, Pipeline};

use crate::cli::ConfigArgs;

pub fn run(
    args: ConfigArgs,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(&args)?;
    if let Some(input) = input {
        config.cleaned_dir = input;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(format) = format {
        config.format = format;
    }

    if !config.cleaned_dir.exists() {
        return Err(format!(
            "Cleaned workbook not found: {}\nRun 'storelens clean' first.",
            config.cleaned_dir.display()
        )
        .into());
    }

    if !args.json {
        println!(
            "{} {}",
            "Analyzing".cyan().bold(),
            config.cleaned_dir.display().to_string().white()
        );
    }

    let pipeline = Pipeline::new(config);
    let summary = pipeline.analyze()?;
    let report = &summary.report;

    if args.json {
        let segments: BTreeMap<String, usize> = report
            .segment_counts()
            .iter()
            .map(|(segment, n)| (segment.to_string(), *n))
            .collect();
        let status = serde_json::json!({
            "files": summary.files,
            "customers": report.segmentation.len(),
            "categories": report.top_categories.len(),
            "inactive_customers": report.inactive_customers(),
            "segments": segments,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "Segmented {} customers:",
        report.segmentation.len().to_string().white().bold()
    );
    for (segment, count) in report.segment_counts() {
        println!("  {:10} {}", segment.to_string(), count);
    }

    if let Some(top) = report.top_categories.first() {
        println!(
            "Top category: {} ({:.2}, {:.2}% of revenue)",
            top.product_category.white().bold(),
            top.order_value,
            top.percent_of_total
        );
    }
    println!(
        "Inactive customers: {}",
        report.inactive_customers().to_string().yellow()
    );

    println!();
    println!("{} {} tables", "Saved".green().bold(), summary.files.len());
    if verbose {
        for file in &summary.files {
            println!("  {}", file.display());
        }
    } else {
        println!(
            "  in {}",
            pipeline.config().output_dir.display().to_string().white()
        );
    }

    Ok(())
}
