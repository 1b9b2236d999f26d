//! propfix: Detect public fields in C# sources and rewrite them as auto-properties.
//!
//! Scans `.cs` files for publicly exposed fields, reports each as a
//! `PublicField` diagnostic, and can rewrite flagged declarations into
//! equivalent auto-properties.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use propfix::cli::{Args, Commands};
use propfix::detector::{self, DetectionResult, Diagnostic, Severity};
use propfix::rewriter::{self, RewritePlan};
use propfix::rules::Registry;
use propfix::scanner;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Detect {
            paths,
            exclude,
            no_default_excludes,
            json,
            verbose,
        } => cmd_detect(paths, &exclude, !no_default_excludes, json, verbose),
        Commands::Apply {
            write,
            interactive,
            paths,
            exclude,
            no_default_excludes,
        } => cmd_apply(write, interactive, paths, &exclude, !no_default_excludes),
        Commands::Rules { json } => cmd_rules(json),
        Commands::Scan {
            paths,
            exclude,
            no_default_excludes,
        } => cmd_scan(paths, &exclude, !no_default_excludes),
    }
}

fn cmd_detect(
    paths: Option<Vec<PathBuf>>,
    exclude: &[String],
    default_excludes: bool,
    json_output: bool,
    verbose: bool,
) -> Result<()> {
    let scan_paths = paths.unwrap_or_else(|| vec![PathBuf::from(".")]);
    let files = scanner::collect_cs_files(&scan_paths, exclude, default_excludes)?;
    if verbose {
        eprintln!(
            "{} Found {} .cs files to scan",
            "info:".blue().bold(),
            files.len()
        );
    }

    let mut decls = Vec::new();
    for file in &files {
        decls.extend(scanner::extract_field_decls(file)?);
    }

    if verbose {
        eprintln!(
            "{} Checked {} field declarations",
            "info:".blue().bold(),
            decls.len()
        );
    }

    let mut result = detector::analyze(&decls)?;
    result.summary.files_scanned = files.len();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_detection_result(&result, verbose);
    }

    Ok(())
}

fn cmd_apply(
    write: bool,
    interactive: bool,
    paths: Option<Vec<PathBuf>>,
    exclude: &[String],
    default_excludes: bool,
) -> Result<()> {
    let scan_paths = paths.unwrap_or_else(|| vec![PathBuf::from(".")]);
    let files = scanner::collect_cs_files(&scan_paths, exclude, default_excludes)?;
    let registry = Registry::builtin();

    let mut any_changes = false;

    for file in &files {
        let source = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let fixes = collect_fixes(&source, file, &registry)?;
        if fixes.is_empty() {
            continue;
        }
        any_changes = true;

        println!(
            "\n{} {}",
            if write || interactive {
                "Updating:"
            } else {
                "Would update:"
            }
            .yellow()
            .bold(),
            file.display()
        );
        for (diagnostic, plan) in &fixes {
            let original = &source[plan.start_offset..plan.end_offset];
            println!(
                "  {}:{}: {}",
                diagnostic.line,
                diagnostic.column,
                original.red()
            );
            for replacement in &plan.replacements {
                println!("    {} {}", "->".green(), replacement.render("").green());
            }
        }

        let confirmed = if interactive {
            Confirm::new()
                .with_prompt(format!("Apply changes to {}?", file.display()))
                .default(true)
                .interact()?
        } else {
            write
        };

        if confirmed {
            let plans: Vec<RewritePlan> = fixes.into_iter().map(|(_, plan)| plan).collect();
            rewriter::apply_to_file(file, &plans)?;
        }
    }

    if !any_changes {
        println!("{} No changes to apply", "info:".blue().bold());
    } else if !write && !interactive {
        println!("\n{} Use --write to apply changes", "hint:".cyan().bold());
    }

    Ok(())
}

/// Maps each diagnostic in a file to its rewrite plan.
///
/// Plans are resolved from the diagnostic's span, the same handoff a host
/// editor would perform. A span that no longer resolves is reported and
/// skipped; it never aborts the other fixes or touches the file.
fn collect_fixes(
    source: &str,
    file: &Path,
    registry: &Registry,
) -> Result<Vec<(Diagnostic, RewritePlan)>> {
    let mut fixes = Vec::new();

    for decl in scanner::extract_from_source(source, file)? {
        for diagnostic in registry.run(&decl)? {
            match rewriter::plan_for_span(source, file, diagnostic.start_offset, diagnostic.end_offset)
            {
                Ok(plan) => fixes.push((diagnostic, plan)),
                Err(err) => eprintln!(
                    "{} fix could not be applied at {}:{}: {}",
                    "warn:".yellow().bold(),
                    file.display(),
                    diagnostic.line,
                    err
                ),
            }
        }
    }

    Ok(fixes)
}

fn cmd_rules(json_output: bool) -> Result<()> {
    let registry = Registry::builtin();

    if json_output {
        println!("{}", serde_json::to_string_pretty(registry.rules())?);
        return Ok(());
    }

    for rule in registry.rules() {
        let severity = match rule.severity {
            Severity::Warning => "warning",
        };
        let status = if rule.enabled_by_default {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!(
            "{}  {}  {}  {}",
            rule.id.bold(),
            rule.category.dimmed(),
            severity.yellow(),
            status
        );
    }

    Ok(())
}

fn cmd_scan(paths: Option<Vec<PathBuf>>, exclude: &[String], default_excludes: bool) -> Result<()> {
    let scan_paths = paths.unwrap_or_else(|| vec![PathBuf::from(".")]);
    let files = scanner::collect_cs_files(&scan_paths, exclude, default_excludes)?;

    println!("Would scan {} files:", files.len());
    for file in files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn print_detection_result(result: &DetectionResult, verbose: bool) {
    let s = &result.summary;

    if verbose {
        println!(
            "\n{} Files: {}, Fields: {} ({} clean, {} flagged)",
            "Summary:".bold(),
            s.files_scanned,
            s.fields_found,
            s.clean_fields,
            s.flagged_fields
        );
    }

    if result.findings.is_empty() {
        println!("{} No public fields found", "ok:".green().bold());
        return;
    }

    println!(
        "\n{} {} public field declaration(s):\n",
        "Found".red().bold(),
        s.flagged_fields
    );

    for finding in &result.findings {
        let loc = format!(
            "{}:{}:{}",
            finding.file.display(),
            finding.line,
            finding.column
        );
        println!(
            "  {} {} {}",
            loc.dimmed(),
            format!("[{}]", finding.rule_id).yellow(),
            finding.message
        );
    }
}
