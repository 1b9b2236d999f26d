//! Public-field detection.
//!
//! Evaluates lowered field declarations against the `PublicField` rule:
//! a field qualifies when its modifiers contain `public` and do not contain
//! `const`. `static` and `readonly` never exempt a field; the concern is
//! direct field exposure, not mutability.

use crate::scanner::{FieldDecl, Modifier};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Diagnostic id of the public-field rule.
pub const RULE_ID: &str = "PublicField";

/// Diagnostic category of the public-field rule.
pub const CATEGORY: &str = "PublicField.CSharp.Suggestion";

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

/// A reported rule violation with its source location.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Rule that produced the diagnostic.
    pub rule_id: &'static str,
    /// Rule category string.
    pub category: &'static str,
    pub severity: Severity,
    /// Human-readable message, e.g. `"Count" is public field.`
    pub message: String,
    /// Source file containing the flagged declaration.
    pub file: PathBuf,
    /// Line number, 1-indexed.
    pub line: usize,
    /// Column number, 1-indexed.
    pub column: usize,
    /// Byte offset of the start of the flagged declaration.
    pub start_offset: usize,
    /// Byte offset of the end of the flagged declaration.
    pub end_offset: usize,
}

/// Contract violations in detector input.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The declaration carries no variable bindings. The parser never
    /// produces such a node; receiving one is a caller bug.
    #[error("field declaration at {}:{} has no variable bindings", .file.display(), .line)]
    NoBindings { file: PathBuf, line: usize },
}

/// Summary statistics from a detection run.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    pub fields_found: usize,
    pub clean_fields: usize,
    pub flagged_fields: usize,
}

/// Complete detection results.
#[derive(Debug, Serialize)]
pub struct DetectionResult {
    pub findings: Vec<Diagnostic>,
    pub summary: Summary,
}

/// Evaluates one field declaration against the public-field rule.
///
/// Returns `Ok(None)` for declarations the rule does not apply to, and a
/// [`Diagnostic`] spanning the whole declaration otherwise. A declaration
/// with zero variables fails fast with [`DetectError::NoBindings`].
pub fn evaluate(decl: &FieldDecl) -> Result<Option<Diagnostic>, DetectError> {
    if decl.variables.is_empty() {
        return Err(DetectError::NoBindings {
            file: decl.file.clone(),
            line: decl.line,
        });
    }

    if !decl.has_modifier(Modifier::Public) || decl.has_modifier(Modifier::Const) {
        return Ok(None);
    }

    Ok(Some(Diagnostic {
        rule_id: RULE_ID,
        category: CATEGORY,
        severity: Severity::Warning,
        message: format_message(decl),
        file: decl.file.clone(),
        line: decl.line,
        column: decl.column,
        start_offset: decl.start_offset,
        end_offset: decl.end_offset,
    }))
}

/// Formats the diagnostic message for a qualifying declaration.
///
/// Each declared name is quoted and comma-joined; the verb agrees with the
/// number of names: `"x" is public field.` / `"a", "b" are public field.`
fn format_message(decl: &FieldDecl) -> String {
    let names = decl
        .variables
        .iter()
        .map(|v| format!("\"{}\"", v.name))
        .collect::<Vec<_>>()
        .join(", ");
    let verb = if decl.variables.len() > 1 { "are" } else { "is" };
    format!("{} {} public field.", names, verb)
}

/// Evaluates a batch of declarations, accumulating summary counters.
///
/// `files_scanned` is left for the caller to fill in; the detector only
/// sees declarations, not files.
pub fn analyze(decls: &[FieldDecl]) -> Result<DetectionResult, DetectError> {
    let mut findings = Vec::new();

    for decl in decls {
        if let Some(diagnostic) = evaluate(decl)? {
            findings.push(diagnostic);
        }
    }

    let summary = Summary {
        files_scanned: 0,
        fields_found: decls.len(),
        clean_fields: decls.len() - findings.len(),
        flagged_fields: findings.len(),
    };

    Ok(DetectionResult { findings, summary })
}
