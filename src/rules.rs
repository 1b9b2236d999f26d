//! Rule registration and dispatch.
//!
//! Rules are registered explicitly at startup as `id -> handler` records
//! rather than discovered through runtime reflection. Each record carries
//! the metadata a host reporting channel needs: id, category, severity, and
//! whether the rule is enabled by default. The registry dispatches one
//! declaration at a time; when and how often to call it is the caller's
//! scheduling concern.

use crate::detector::{self, DetectError, Diagnostic, Severity};
use crate::scanner::FieldDecl;
use serde::Serialize;

/// Handler signature shared by all declaration rules.
pub type Handler = fn(&FieldDecl) -> Result<Option<Diagnostic>, DetectError>;

/// A registered rule with its reporting metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub enabled_by_default: bool,
    #[serde(skip)]
    pub handler: Handler,
}

/// Registry of declaration rules.
#[derive(Debug, Default)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with all built-in rules registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Rule {
            id: detector::RULE_ID,
            category: detector::CATEGORY,
            severity: Severity::Warning,
            enabled_by_default: true,
            handler: detector::evaluate,
        });
        registry
    }

    /// Adds a rule. Later registrations run after earlier ones.
    pub fn register(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Registered rules in registration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Runs every enabled rule against one declaration.
    pub fn run(&self, decl: &FieldDecl) -> Result<Vec<Diagnostic>, DetectError> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            if !rule.enabled_by_default {
                continue;
            }
            if let Some(diagnostic) = (rule.handler)(decl)? {
                diagnostics.push(diagnostic);
            }
        }
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::extract_from_source;
    use std::path::Path;

    #[test]
    fn builtin_registers_public_field_rule() {
        let registry = Registry::builtin();
        assert_eq!(registry.rules().len(), 1);
        let rule = &registry.rules()[0];
        assert_eq!(rule.id, "PublicField");
        assert_eq!(rule.category, "PublicField.CSharp.Suggestion");
        assert!(rule.enabled_by_default);
    }

    #[test]
    fn run_dispatches_to_registered_handler() {
        let registry = Registry::builtin();
        let decls = extract_from_source("class C { public int A; }", Path::new("test.cs")).unwrap();
        let diagnostics = registry.run(&decls[0]).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "PublicField");
    }

    #[test]
    fn run_reports_nothing_for_clean_declaration() {
        let registry = Registry::builtin();
        let decls =
            extract_from_source("class C { private int a; }", Path::new("test.cs")).unwrap();
        assert!(registry.run(&decls[0]).unwrap().is_empty());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut registry = Registry::new();
        registry.register(Rule {
            id: "PublicField",
            category: "PublicField.CSharp.Suggestion",
            severity: Severity::Warning,
            enabled_by_default: false,
            handler: crate::detector::evaluate,
        });
        let decls = extract_from_source("class C { public int A; }", Path::new("test.cs")).unwrap();
        assert!(registry.run(&decls[0]).unwrap().is_empty());
    }
}
