//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: detecting public
//! fields, applying the property conversion, listing registered rules, or
//! listing scan targets.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Detect public fields in C# sources and rewrite them as auto-properties.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan files and report public-field diagnostics.
    Detect {
        /// Paths to scan. Defaults to current directory.
        #[arg(short, long)]
        paths: Option<Vec<PathBuf>>,

        /// Glob patterns for directories/files to exclude (e.g., "obj", "*.Designer.cs").
        /// By default, entries starting with `.` or `_` are excluded.
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert flagged fields to auto-properties.
    Apply {
        /// Actually modify files (default is dry-run).
        #[arg(long)]
        write: bool,

        /// Interactively confirm each file's changes before applying.
        /// Implies --write for confirmed files.
        #[arg(short, long)]
        interactive: bool,

        /// Paths to scan. Defaults to current directory.
        #[arg(short, long)]
        paths: Option<Vec<PathBuf>>,

        /// Glob patterns for directories/files to exclude (e.g., "obj", "*.Designer.cs").
        /// By default, entries starting with `.` or `_` are excluded.
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,
    },

    /// List registered rules and their metadata.
    Rules {
        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// List files that would be scanned without processing them.
    Scan {
        /// Paths to scan. Defaults to current directory.
        #[arg(short, long)]
        paths: Option<Vec<PathBuf>>,

        /// Glob patterns for directories/files to exclude (e.g., "obj", "*.Designer.cs").
        /// By default, entries starting with `.` or `_` are excluded.
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Disable default exclusion of `.` and `_` prefixed entries.
        #[arg(long)]
        no_default_excludes: bool,
    },
}
