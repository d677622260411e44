//! Output formatters for extractions

use anyhow::Result;
use colored::*;
use procura_core::{Extraction, SheetResult};
use std::path::{Path, PathBuf};

fn selected<'a>(
    extraction: &'a Extraction,
    sheet: Option<&'a str>,
) -> impl Iterator<Item = &'a SheetResult> + 'a {
    extraction
        .sheets()
        .iter()
        .filter(move |s| sheet.is_none_or(|name| s.name == name))
}

/// Print extracted sheets as aligned tables
pub fn print_human(file_path: &Path, extraction: &Extraction, sheet: Option<&str>) {
    println!("{}", format!("File: {}", file_path.display()).bold());
    println!();

    if extraction.is_empty() {
        println!("{}", "✗ No data rows found".yellow().bold());
        println!();
        return;
    }

    for result in selected(extraction, sheet) {
        println!(
            "{} {} {}",
            "Sheet:".bold(),
            result.name.cyan().bold(),
            format!("(header at row {})", result.header_row + 1).bright_black()
        );
        print_table(result);
        println!();
    }

    println!("{}", "Summary:".bold().underline());
    println!("  {} {}", "Sheets:".green().bold(), extraction.len());
    println!(
        "  {} {}",
        "Records:".green().bold(),
        extraction.total_records()
    );
    println!();
}

fn print_table(result: &SheetResult) {
    let mut widths: Vec<usize> = result.keys.iter().map(|k| k.chars().count()).collect();
    for record in &result.records {
        for (width, key) in widths.iter_mut().zip(&result.keys) {
            let len = record.get(key).map(|v| v.chars().count()).unwrap_or(0);
            *width = (*width).max(len);
        }
    }
    let id_width = result
        .records
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);

    let header: Vec<String> = result
        .keys
        .iter()
        .zip(&widths)
        .map(|(key, width)| format!("{:<width$}", key, width = *width))
        .collect();
    println!(
        "  {}  {}",
        format!("{:>id_width$}", "id", id_width = id_width).bright_black(),
        header.join("  ").bold()
    );

    for record in &result.records {
        let cells: Vec<String> = result
            .keys
            .iter()
            .zip(&widths)
            .map(|(key, width)| {
                format!("{:<width$}", record.get(key).unwrap_or(""), width = *width)
            })
            .collect();
        println!(
            "  {}  {}",
            format!("{:>id_width$}", record.id, id_width = id_width).bright_black(),
            cells.join("  ")
        );
    }
}

/// Print extractions in JSON format
pub fn print_json(reports: &[(PathBuf, Extraction)], sheet: Option<&str>) -> Result<()> {
    let files: Vec<serde_json::Value> = reports
        .iter()
        .map(|(path, extraction)| {
            let sheets: Vec<&SheetResult> = selected(extraction, sheet).collect();
            serde_json::json!({
                "file": path.display().to_string(),
                "sheets": sheets,
                "summary": {
                    "sheets": extraction.len(),
                    "records": extraction.total_records(),
                }
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}
