//! Offline CSV statement parsing
//!
//! Runs the local pipeline (keyword categorizer only, no remote
//! collaborators) and prints the report as JSON.

use std::path::Path;

use anyhow::{Context, Result};

use moneymap_core::categorize::Categorizer;
use moneymap_core::statement::parse_csv_statement;

pub async fn cmd_parse(file: &Path, user: &str) -> Result<()> {
    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read statement: {}", file.display()))?;

    let report = parse_csv_statement(&data, user, &Categorizer::local()).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    eprintln!(
        "\n{} transactions | income ${:.2} | spending ${:.2} | score {:.0}",
        report.transactions.len(),
        report.total_income,
        report.total_spending,
        report.optimization_score
    );
    if !report.insights.is_empty() {
        eprintln!("Insights:");
        for insight in &report.insights {
            eprintln!(
                "  - {} (potential savings ${:.2})",
                insight.title, insight.potential_savings
            );
        }
    }

    Ok(())
}
