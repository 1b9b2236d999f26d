//! C# file scanner.
//!
//! Recursively walks directories to collect `.cs` files, skipping entries
//! whose names start with `.` or `_` plus any user-supplied glob excludes.
//! Uses tree-sitter with the C# grammar to parse each file and lower every
//! `field_declaration` node into the [`FieldDecl`] model the detector and
//! rewriter operate on.

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tree_sitter::Node;
use walkdir::WalkDir;

/// A C# field modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    New,
    Static,
    Readonly,
    Volatile,
    Const,
    Unsafe,
    Required,
    Fixed,
}

impl Modifier {
    /// Parses a modifier keyword as it appears in source.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "internal" => Some(Self::Internal),
            "new" => Some(Self::New),
            "static" => Some(Self::Static),
            "readonly" => Some(Self::Readonly),
            "volatile" => Some(Self::Volatile),
            "const" => Some(Self::Const),
            "unsafe" => Some(Self::Unsafe),
            "required" => Some(Self::Required),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    /// The keyword as written in source.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::New => "new",
            Self::Static => "static",
            Self::Readonly => "readonly",
            Self::Volatile => "volatile",
            Self::Const => "const",
            Self::Unsafe => "unsafe",
            Self::Required => "required",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One declared name within a field declaration.
#[derive(Debug, Clone, Serialize)]
pub struct VarBinding {
    /// Declared identifier, e.g. `"Count"`.
    pub name: String,
    /// Initializer expression text, verbatim, if present.
    pub initializer: Option<String>,
}

/// A field declaration lowered from the syntax tree.
///
/// One `FieldDecl` covers the whole declaration statement, including all
/// co-declared variables, attribute lists, and the terminating semicolon.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDecl {
    /// Modifier keywords in declaration order.
    pub modifiers: Vec<Modifier>,
    /// Declared type text, verbatim, e.g. `"int"` or `"List<string>"`.
    pub ty: String,
    /// Attribute lists, verbatim including brackets, in order.
    pub attributes: Vec<String>,
    /// Declared variables in declaration order. Non-empty by contract.
    pub variables: Vec<VarBinding>,
    /// Source file containing the declaration.
    pub file: PathBuf,
    /// Line number, 1-indexed.
    pub line: usize,
    /// Column number, 1-indexed, counted in characters.
    pub column: usize,
    /// Byte offset of the start of the declaration (first attribute or modifier).
    pub start_offset: usize,
    /// Byte offset just past the terminating semicolon.
    pub end_offset: usize,
}

impl FieldDecl {
    /// Whether the declaration carries the given modifier.
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Collects all `.cs` files under `paths`.
///
/// With `default_excludes` set, entries whose names start with `.` or `_`
/// are skipped. `exclude` holds additional glob patterns matched against
/// file and directory names.
pub fn collect_cs_files(
    paths: &[PathBuf],
    exclude: &[String],
    default_excludes: bool,
) -> Result<Vec<PathBuf>> {
    let patterns: Vec<Pattern> = exclude
        .iter()
        .map(|e| Pattern::new(e).with_context(|| format!("Invalid exclude pattern '{}'", e)))
        .collect::<Result<_>>()?;

    let mut files = Vec::new();

    for path in paths {
        // The root entry is exempt from exclusion: scanning `.` or an
        // explicitly named `_`-prefixed directory must walk it.
        for entry in WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_excluded(e, &patterns, default_excludes))
        {
            let entry = entry?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "cs")
            {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn is_excluded(entry: &walkdir::DirEntry, patterns: &[Pattern], default_excludes: bool) -> bool {
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if default_excludes && (name.starts_with('.') || name.starts_with('_')) {
        return true;
    }
    patterns.iter().any(|p| p.matches(name))
}

/// Parses a C# file and lowers all field declarations.
pub fn extract_field_decls(file: &Path) -> Result<Vec<FieldDecl>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    extract_from_source(&source, file)
}

/// Parses C# source text and lowers all field declarations.
///
/// Walks the tree collecting `field_declaration` nodes at any nesting depth
/// (classes, structs, nested types). Parse errors are reported to stderr but
/// do not abort extraction; well-formed declarations elsewhere in the file
/// are still lowered.
pub fn extract_from_source(source: &str, file: &Path) -> Result<Vec<FieldDecl>> {
    let mut parser = parser()?;
    let tree = parser
        .parse(source, None)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if tree.root_node().has_error() {
        eprintln!("warn: Parse errors in {}", file.display());
    }

    let mut decls = Vec::new();
    collect_fields(tree.root_node(), source, file, &mut decls);
    Ok(decls)
}

fn parser() -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
        .context("Failed to load C# grammar")?;
    Ok(parser)
}

fn collect_fields(node: Node<'_>, source: &str, file: &Path, decls: &mut Vec<FieldDecl>) {
    if node.kind() == "field_declaration" {
        if let Some(decl) = lower_field(node, source, file) {
            decls.push(decl);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_fields(child, source, file, decls);
    }
}

/// Lowers one `field_declaration` node.
///
/// The grammar shapes the node as:
/// ```text
/// field_declaration
///   attribute_list*
///   modifier*
///   variable_declaration
///     type: (_)
///     variable_declarator ("," variable_declarator)*
///   ";"
/// ```
///
/// Returns `None` for malformed nodes (missing declaration or no declarators),
/// which only arise from files with parse errors.
fn lower_field(node: Node<'_>, source: &str, file: &Path) -> Option<FieldDecl> {
    let mut modifiers = Vec::new();
    let mut attributes = Vec::new();
    let mut var_decl = None;

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "attribute_list" => attributes.push(node_text(child, source).to_string()),
            "modifier" => {
                if let Some(modifier) = Modifier::parse(node_text(child, source)) {
                    modifiers.push(modifier);
                }
            }
            "variable_declaration" => var_decl = Some(child),
            _ => {}
        }
    }

    let var_decl = var_decl?;
    let ty = declared_type(var_decl, source)?;

    let mut variables = Vec::new();
    let mut cursor = var_decl.walk();
    for declarator in var_decl.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let name = declarator_name(declarator, source)?;
        variables.push(VarBinding {
            name,
            initializer: declarator_initializer(declarator, source),
        });
    }

    if variables.is_empty() {
        return None;
    }

    // tree-sitter points count bytes within the line; report characters.
    let line_start = source[..node.start_byte()].rfind('\n').map_or(0, |i| i + 1);
    Some(FieldDecl {
        modifiers,
        ty,
        attributes,
        variables,
        file: file.to_path_buf(),
        line: node.start_position().row + 1,
        column: source[line_start..node.start_byte()].chars().count() + 1,
        start_offset: node.start_byte(),
        end_offset: node.end_byte(),
    })
}

fn declared_type(var_decl: Node<'_>, source: &str) -> Option<String> {
    if let Some(ty) = var_decl.child_by_field_name("type") {
        return Some(node_text(ty, source).to_string());
    }
    // Grammar versions without the field name: the type is the first named
    // child preceding the declarators.
    let mut cursor = var_decl.walk();
    var_decl
        .named_children(&mut cursor)
        .find(|c| c.kind() != "variable_declarator")
        .map(|c| node_text(c, source).to_string())
}

fn declarator_name(declarator: Node<'_>, source: &str) -> Option<String> {
    if let Some(name) = declarator.child_by_field_name("name") {
        return Some(node_text(name, source).to_string());
    }
    let mut cursor = declarator.walk();
    declarator
        .named_children(&mut cursor)
        .find(|c| c.kind() == "identifier")
        .map(|c| node_text(c, source).to_string())
}

/// Extracts the initializer expression following `=`, if any.
fn declarator_initializer(declarator: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = declarator.walk();
    for child in declarator.children(&mut cursor) {
        if child.kind() == "=" {
            let expr = source[child.end_byte()..declarator.end_byte()].trim();
            if !expr.is_empty() {
                return Some(expr.to_string());
            }
        }
        // Some grammar versions wrap the initializer in its own node.
        if child.kind() == "equals_value_clause" {
            let text = node_text(child, source).trim_start_matches('=').trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}
