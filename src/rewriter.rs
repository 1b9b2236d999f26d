//! Field-to-property rewriting.
//!
//! Builds a [`RewritePlan`] for a flagged field declaration: one auto-property
//! per declared variable, preserving attributes, type, modifiers, and
//! initializers. Plans are applied as position-aware text replacements using
//! the byte offsets captured during extraction; changes are sorted by position
//! and applied in reverse order to preserve offset validity.

use crate::scanner::{self, FieldDecl, Modifier};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Accessor shape of a generated property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessorKind {
    /// `{ get; }`, chosen for `readonly` fields.
    ReadOnly,
    /// `{ get; set; }`, the default.
    ReadWrite,
}

/// One generated auto-property declaration.
#[derive(Debug, Clone, Serialize)]
pub struct AccessorDecl {
    /// Attribute lists copied verbatim from the original declaration.
    pub attributes: Vec<String>,
    /// Original modifiers, minus `readonly` when the shape is `ReadOnly`.
    pub modifiers: Vec<Modifier>,
    /// Declared type text, verbatim.
    pub ty: String,
    /// Property name; identical to the original variable name.
    pub name: String,
    pub kind: AccessorKind,
    /// Initializer expression text, verbatim, if the variable had one.
    pub initializer: Option<String>,
}

/// A computed replacement for one field declaration.
#[derive(Debug, Clone, Serialize)]
pub struct RewritePlan {
    /// Byte range of the original declaration; all co-declared variables are
    /// replaced together, never partially.
    pub start_offset: usize,
    pub end_offset: usize,
    /// Generated properties, one per original variable, in original order.
    pub replacements: Vec<AccessorDecl>,
}

/// Failures when resolving a rewrite target.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The target span does not resolve to a field declaration. No edit is
    /// performed.
    #[error("no field declaration at byte range {start}..{end}")]
    InvalidTarget { start: usize, end: usize },
    #[error("parse failed: {0}")]
    Parse(String),
}

/// Builds the rewrite plan for a field declaration.
///
/// `readonly` fields become get-only properties with the `readonly` modifier
/// dropped; read-only-ness is now expressed by the accessor shape. All other
/// modifiers, the attribute lists, the type, each variable's name, and each
/// initializer carry over unchanged.
pub fn build_plan(decl: &FieldDecl) -> RewritePlan {
    let read_only = decl.has_modifier(Modifier::Readonly);
    let kind = if read_only {
        AccessorKind::ReadOnly
    } else {
        AccessorKind::ReadWrite
    };

    let modifiers: Vec<Modifier> = if read_only {
        decl.modifiers
            .iter()
            .copied()
            .filter(|m| *m != Modifier::Readonly)
            .collect()
    } else {
        decl.modifiers.clone()
    };

    let replacements = decl
        .variables
        .iter()
        .map(|binding| AccessorDecl {
            attributes: decl.attributes.clone(),
            modifiers: modifiers.clone(),
            ty: decl.ty.clone(),
            name: binding.name.clone(),
            kind,
            initializer: binding.initializer.clone(),
        })
        .collect();

    RewritePlan {
        start_offset: decl.start_offset,
        end_offset: decl.end_offset,
        replacements,
    }
}

/// Resolves a byte span to a field declaration and builds its plan.
///
/// The span must match a declaration exactly; a sloppy overlap match could
/// grab a sibling. An unresolvable span fails with
/// [`RewriteError::InvalidTarget`] and no edit is produced.
pub fn plan_for_span(
    source: &str,
    file: &Path,
    start: usize,
    end: usize,
) -> Result<RewritePlan, RewriteError> {
    let decls = scanner::extract_from_source(source, file)
        .map_err(|e| RewriteError::Parse(e.to_string()))?;
    let decl = decls
        .iter()
        .find(|d| d.start_offset == start && d.end_offset == end)
        .ok_or(RewriteError::InvalidTarget { start, end })?;
    Ok(build_plan(decl))
}

impl AccessorDecl {
    /// Renders the property as source text.
    ///
    /// Attribute lists each take their own line; continuation lines are
    /// prefixed with `indent`. Exact column alignment beyond the preserved
    /// indentation is the reader's formatter's concern.
    pub fn render(&self, indent: &str) -> String {
        let mut lines: Vec<String> = self.attributes.clone();

        let mut decl = String::new();
        for modifier in &self.modifiers {
            decl.push_str(modifier.keyword());
            decl.push(' ');
        }
        decl.push_str(&self.ty);
        decl.push(' ');
        decl.push_str(&self.name);
        decl.push_str(match self.kind {
            AccessorKind::ReadOnly => " { get; }",
            AccessorKind::ReadWrite => " { get; set; }",
        });
        if let Some(init) = &self.initializer {
            decl.push_str(" = ");
            decl.push_str(init);
            decl.push(';');
        }
        lines.push(decl);

        lines.join(&format!("\n{}", indent))
    }
}

/// Applies rewrite plans to source content, returning the modified string.
///
/// Sorts plans by start offset (descending) and replaces each declaration's
/// span with its rendered properties, so earlier replacements don't
/// invalidate later offsets. Text after the declaration on the same line
/// survives.
pub fn apply_plans(content: &str, plans: &[RewritePlan]) -> String {
    let mut ordered: Vec<&RewritePlan> = plans.iter().collect();
    ordered.sort_by(|a, b| b.start_offset.cmp(&a.start_offset));

    let mut result = content.to_string();
    for plan in ordered {
        if plan.start_offset <= plan.end_offset && plan.end_offset <= result.len() {
            let indent = indent_at(content, plan.start_offset);
            let rendered: Vec<String> = plan
                .replacements
                .iter()
                .map(|r| r.render(indent))
                .collect();
            let replacement = rendered.join(&format!("\n{}", indent));
            result.replace_range(plan.start_offset..plan.end_offset, &replacement);
        }
    }

    result
}

/// Applies rewrite plans to a file's contents and writes the result.
pub fn apply_to_file(file: &Path, plans: &[RewritePlan]) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)?;
    let new_content = apply_plans(&content, plans);
    std::fs::write(file, new_content)?;
    Ok(())
}

/// The whitespace prefix of the line containing `offset`, when the
/// declaration is the first thing on its line.
fn indent_at(content: &str, offset: usize) -> &str {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &content[line_start..offset];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use std::path::{Path, PathBuf};

    fn decls(source: &str) -> Vec<FieldDecl> {
        scanner::extract_from_source(source, Path::new("test.cs")).unwrap()
    }

    fn single_plan(source: &str) -> RewritePlan {
        let decls = decls(source);
        assert_eq!(decls.len(), 1);
        build_plan(&decls[0])
    }

    #[test]
    fn one_replacement_per_variable_in_order() {
        let plan = single_plan("class C { public int X, Y, Z; }");
        let names: Vec<_> = plan.replacements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn replacements_preserve_type_attributes_and_initializers() {
        let plan = single_plan("class C { [Obsolete] public List<int> A = new List<int>(), B; }");
        assert_eq!(plan.replacements.len(), 2);
        for replacement in &plan.replacements {
            assert_eq!(replacement.ty, "List<int>");
            assert_eq!(replacement.attributes, vec!["[Obsolete]"]);
        }
        assert_eq!(
            plan.replacements[0].initializer.as_deref(),
            Some("new List<int>()")
        );
        assert!(plan.replacements[1].initializer.is_none());
    }

    #[test]
    fn readonly_field_maps_to_get_only_property() {
        let plan = single_plan("class C { public readonly int Id = 5; }");
        let replacement = &plan.replacements[0];
        assert_eq!(replacement.kind, AccessorKind::ReadOnly);
        assert!(!replacement.modifiers.contains(&Modifier::Readonly));
        assert!(replacement.modifiers.contains(&Modifier::Public));
    }

    #[test]
    fn mutable_field_maps_to_get_set_with_modifiers_unchanged() {
        let plan = single_plan("class C { public static int Count; }");
        let replacement = &plan.replacements[0];
        assert_eq!(replacement.kind, AccessorKind::ReadWrite);
        assert_eq!(
            replacement.modifiers,
            vec![Modifier::Public, Modifier::Static]
        );
    }

    #[test]
    fn plan_spans_whole_declaration() {
        let source = "class C { public int A = 1, B; }";
        let plan = single_plan(source);
        assert_eq!(
            &source[plan.start_offset..plan.end_offset],
            "public int A = 1, B;"
        );
    }

    #[test]
    fn renders_read_write_property() {
        let plan = single_plan("class C { public int Foo; }");
        assert_snapshot!(plan.replacements[0].render(""), @"public int Foo { get; set; }");
    }

    #[test]
    fn renders_get_only_property_with_initializer() {
        let plan = single_plan("class C { public static readonly double Scale = 1.5; }");
        assert_snapshot!(plan.replacements[0].render(""), @"public static double Scale { get; } = 1.5;");
    }

    #[test]
    fn renders_attributes_on_their_own_lines() {
        let plan = single_plan("class C { [Obsolete] public int Legacy; }");
        let rendered = plan.replacements[0].render("    ");
        assert_eq!(rendered, "[Obsolete]\n    public int Legacy { get; set; }");
    }

    #[test]
    fn applies_plan_splitting_multi_variable_declaration() {
        let source = "class Point {\n    public int X, Y;\n}\n";
        let plans = vec![single_plan(source)];
        let result = apply_plans(source, &plans);
        assert_eq!(
            result,
            "class Point {\n    public int X { get; set; }\n    public int Y { get; set; }\n}\n"
        );
    }

    #[test]
    fn applies_readonly_conversion_keeping_initializer() {
        let source = "class C {\n    public readonly int Id = 5;\n}\n";
        let plans = vec![single_plan(source)];
        let result = apply_plans(source, &plans);
        assert_eq!(result, "class C {\n    public int Id { get; } = 5;\n}\n");
    }

    #[test]
    fn applies_multiple_plans_in_one_file() {
        let source = "class C {\n    public int A;\n    public string B;\n}\n";
        let all = decls(source);
        let plans: Vec<_> = all.iter().map(build_plan).collect();
        let result = apply_plans(source, &plans);
        assert_eq!(
            result,
            "class C {\n    public int A { get; set; }\n    public string B { get; set; }\n}\n"
        );
    }

    #[test]
    fn preserves_content_after_declaration_on_same_line() {
        let source = "class C { public int A; // counter\n}\n";
        let plans = vec![single_plan(source)];
        let result = apply_plans(source, &plans);
        assert_eq!(result, "class C { public int A { get; set; } // counter\n}\n");
    }

    #[test]
    fn empty_plans_return_original() {
        let source = "class C { public int A; }";
        assert_eq!(apply_plans(source, &[]), source);
    }

    #[test]
    fn plan_for_span_resolves_exact_declaration() {
        let source = "class C {\n    public int A;\n}\n";
        let all = decls(source);
        let plan = plan_for_span(
            source,
            Path::new("test.cs"),
            all[0].start_offset,
            all[0].end_offset,
        )
        .unwrap();
        assert_eq!(plan.replacements[0].name, "A");
    }

    #[test]
    fn plan_for_span_rejects_non_declaration_target() {
        let source = "class C {\n    public int A;\n}\n";
        let err = plan_for_span(source, Path::new("test.cs"), 0, 5).unwrap_err();
        assert!(matches!(
            err,
            RewriteError::InvalidTarget { start: 0, end: 5 }
        ));
    }

    #[test]
    fn failed_resolution_leaves_file_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.cs");
        let source = "class C {\n    public int A;\n}\n";
        std::fs::write(&path, source).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(plan_for_span(&content, &path, 3, 7).is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn apply_to_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point.cs");
        std::fs::write(&path, "class Point {\n    public int X, Y;\n}\n").unwrap();

        let all = scanner::extract_field_decls(&path).unwrap();
        let plans: Vec<_> = all.iter().map(build_plan).collect();
        apply_to_file(&path, &plans).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "class Point {\n    public int X { get; set; }\n    public int Y { get; set; }\n}\n"
        );
    }

    #[test]
    fn fixture_rewrite_matches_expected_output() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let source = std::fs::read_to_string(root.join("tests/fixtures/widget.cs")).unwrap();
        let expected =
            std::fs::read_to_string(root.join("tests/fixtures/widget.expected.cs")).unwrap();

        let all = scanner::extract_from_source(&source, Path::new("widget.cs")).unwrap();
        let plans: Vec<_> = all
            .iter()
            .filter(|d| crate::detector::evaluate(d).unwrap().is_some())
            .map(build_plan)
            .collect();

        assert_eq!(apply_plans(&source, &plans), expected);
    }
}
