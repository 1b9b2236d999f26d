//! propfix library for detecting public fields and rewriting them as properties.
//!
//! This library provides programmatic access to the field-to-property
//! refactoring functionality. The core workflow involves three phases:
//!
//! 1. **Scanning**: Collect `.cs` files and lower `field_declaration` nodes
//! 2. **Detection**: Evaluate each declaration against the `PublicField` rule
//! 3. **Rewriting**: Build per-declaration rewrite plans and apply them
//!
//! # Example
//!
//! ```no_run
//! use propfix::{scanner, rules, rewriter};
//! use std::path::PathBuf;
//!
//! // Collect files and lower field declarations
//! let files = scanner::collect_cs_files(&[PathBuf::from("./src")], &[], true).unwrap();
//! let registry = rules::Registry::builtin();
//!
//! for file in &files {
//!     for decl in scanner::extract_field_decls(file).unwrap() {
//!         for diagnostic in registry.run(&decl).unwrap() {
//!             println!("{}: {}", diagnostic.file.display(), diagnostic.message);
//!             // Each flagged declaration has an equivalent property form
//!             let plan = rewriter::build_plan(&decl);
//!             println!("  {} replacement(s)", plan.replacements.len());
//!         }
//!     }
//! }
//! ```

pub mod cli;
pub mod detector;
pub mod rewriter;
pub mod rules;
pub mod scanner;

// Re-export commonly used types at crate root
pub use detector::{DetectError, DetectionResult, Diagnostic, Severity, Summary};
pub use rewriter::{AccessorDecl, AccessorKind, RewriteError, RewritePlan};
pub use scanner::{FieldDecl, Modifier, VarBinding};
