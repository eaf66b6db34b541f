use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::error::{PyIndexError, Result};
use crate::models::description::{
    ClassDescription, FunctionDescription, ImportDescription, ModuleDescription,
};

/// Turns Python source into a [`ModuleDescription`] using tree-sitter.
///
/// Only top-level statements are inspected: imports, functions, classes
/// (with the functions directly in their body as methods) and name bindings.
/// Source with syntax errors still yields whatever tree-sitter recovered.
pub struct PythonAnalyzer {
    language: Language,
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn make_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| PyIndexError::Parse {
                path: String::new(),
                detail: format!("failed to set Python language: {e}"),
            })?;
        Ok(parser)
    }

    /// Read and analyze one file.
    pub fn analyze_file(&self, path: &Path) -> Result<ModuleDescription> {
        let source = std::fs::read_to_string(path)?;
        self.analyze(&path.to_string_lossy(), &source)
    }

    /// Analyze source text; `path` is recorded verbatim on the description.
    pub fn analyze(&self, path: &str, source: &str) -> Result<ModuleDescription> {
        let mut parser = self.make_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| PyIndexError::Parse {
                path: path.to_string(),
                detail: "tree-sitter parse returned None".into(),
            })?;
        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!(path, "syntax errors; keeping recovered definitions");
        }

        let src = source.as_bytes();
        let mut module = ModuleDescription::new(path);
        module.docstring = leading_docstring(root, src);

        for stmt in named_children(root) {
            match stmt.kind() {
                "import_statement" => collect_plain_imports(stmt, src, &mut module.imports),
                "import_from_statement" => collect_from_imports(stmt, src, &mut module.imports),
                "function_definition" => module.functions.push(describe_function(stmt, src)),
                "class_definition" => module.classes.push(describe_class(stmt, src)),
                "decorated_definition" => {
                    if let Some(def) = stmt.child_by_field_name("definition") {
                        match def.kind() {
                            "function_definition" => {
                                module.functions.push(describe_function(def, src));
                            }
                            "class_definition" => module.classes.push(describe_class(def, src)),
                            _ => {}
                        }
                    }
                }
                "expression_statement" => collect_bindings(stmt, src, &mut module),
                _ => {}
            }
        }

        Ok(module)
    }
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn text(node: Node<'_>, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or("").to_string()
}

fn line_of(node: Node<'_>) -> u32 {
    node.start_position().row as u32 + 1
}

fn end_line_of(node: Node<'_>) -> u32 {
    node.end_position().row as u32 + 1
}

// ─── Imports ───

fn collect_plain_imports(stmt: Node<'_>, src: &[u8], out: &mut Vec<ImportDescription>) {
    let mut cursor = stmt.walk();
    for name in stmt.children_by_field_name("name", &mut cursor) {
        let (name, alias) = split_alias(name, src);
        out.push(ImportDescription {
            name,
            alias,
            is_from_import: false,
            parent_module: None,
        });
    }
}

fn collect_from_imports(stmt: Node<'_>, src: &[u8], out: &mut Vec<ImportDescription>) {
    let parent = stmt
        .child_by_field_name("module_name")
        .map(|n| text(n, src));

    let mut names = Vec::new();
    {
        let mut cursor = stmt.walk();
        for name in stmt.children_by_field_name("name", &mut cursor) {
            names.push(split_alias(name, src));
        }
    }
    if names.is_empty()
        && named_children(stmt)
            .iter()
            .any(|c| c.kind() == "wildcard_import")
    {
        names.push(("*".to_string(), None));
    }

    for (name, alias) in names {
        out.push(ImportDescription {
            name,
            alias,
            is_from_import: true,
            parent_module: parent.clone(),
        });
    }
}

/// `a.b as c` -> (`a.b`, Some(`c`)); `a.b` -> (`a.b`, None).
fn split_alias(node: Node<'_>, src: &[u8]) -> (String, Option<String>) {
    if node.kind() == "aliased_import" {
        let name = node
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default();
        let alias = node.child_by_field_name("alias").map(|n| text(n, src));
        (name, alias)
    } else {
        (text(node, src), None)
    }
}

// ─── Definitions ───

fn describe_function(node: Node<'_>, src: &[u8]) -> FunctionDescription {
    FunctionDescription {
        name: node
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default(),
        docstring: node
            .child_by_field_name("body")
            .and_then(|body| leading_docstring(body, src)),
        lineno: line_of(node),
        end_lineno: end_line_of(node),
        args: node
            .child_by_field_name("parameters")
            .map(|p| positional_parameters(p, src))
            .unwrap_or_default(),
        decorators: decorators_of(node, src),
        return_annotation: node.child_by_field_name("return_type").map(|n| text(n, src)),
    }
}

fn describe_class(node: Node<'_>, src: &[u8]) -> ClassDescription {
    let base_classes = node
        .child_by_field_name("superclasses")
        .map(|args| {
            named_children(args)
                .into_iter()
                .filter(|c| !matches!(c.kind(), "keyword_argument" | "comment"))
                .map(|c| text(c, src))
                .collect()
        })
        .unwrap_or_default();

    let mut methods = Vec::new();
    let mut docstring = None;
    if let Some(body) = node.child_by_field_name("body") {
        docstring = leading_docstring(body, src);
        for stmt in named_children(body) {
            let def = if stmt.kind() == "decorated_definition" {
                stmt.child_by_field_name("definition")
            } else {
                Some(stmt)
            };
            if let Some(def) = def.filter(|d| d.kind() == "function_definition") {
                methods.push(describe_function(def, src));
            }
        }
    }

    ClassDescription {
        name: node
            .child_by_field_name("name")
            .map(|n| text(n, src))
            .unwrap_or_default(),
        docstring,
        lineno: line_of(node),
        end_lineno: end_line_of(node),
        base_classes,
        decorators: decorators_of(node, src),
        methods,
    }
}

/// Names of ordinary positional parameters.
///
/// Parameters before a `/` are positional-only and dropped; collection
/// stops at `*`, `*args` or `**kwargs`.
fn positional_parameters(params: Node<'_>, src: &[u8]) -> Vec<String> {
    let mut args = Vec::new();
    for param in named_children(params) {
        match param.kind() {
            "identifier" => args.push(text(param, src)),
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = param.child_by_field_name("name") {
                    args.push(text(name, src));
                }
            }
            "typed_parameter" => match param.named_child(0) {
                Some(inner) if inner.kind() == "identifier" => args.push(text(inner, src)),
                _ => break,
            },
            "positional_separator" => args.clear(),
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }
    args
}

/// Decorator expressions without the leading `@`.
fn decorators_of(def: Node<'_>, src: &[u8]) -> Vec<String> {
    let Some(parent) = def.parent().filter(|p| p.kind() == "decorated_definition") else {
        return Vec::new();
    };
    named_children(parent)
        .into_iter()
        .filter(|c| c.kind() == "decorator")
        .map(|c| text(c, src).trim_start_matches('@').trim().to_string())
        .collect()
}

/// Docstring of a module or block: its first statement, if that is a
/// string expression. Comments before it are skipped.
fn leading_docstring(container: Node<'_>, src: &[u8]) -> Option<String> {
    let first = named_children(container)
        .into_iter()
        .find(|c| c.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    string_literal_value(expr.utf8_text(src).ok()?)
}

/// Value of a string literal: prefix letters and quotes stripped, common
/// escapes decoded unless the literal is raw. Empty -> None.
fn string_literal_value(literal: &str) -> Option<String> {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let prefix = &literal[..literal.len() - body.len()];
    let inner = ["\"\"\"", "'''", "\"", "'"].iter().find_map(|quote| {
        body.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })?;
    if inner.is_empty() {
        return None;
    }
    if prefix.chars().any(|c| c.eq_ignore_ascii_case(&'r')) {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

/// Decode `\n`, `\t`, `\r`, `\0`, `\\`, quotes and line continuations.
/// Other escapes are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(q @ ('\\' | '\'' | '"')) => out.push(q),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// ─── Bindings ───

fn collect_bindings(stmt: Node<'_>, src: &[u8], module: &mut ModuleDescription) {
    for expr in named_children(stmt) {
        if expr.kind() != "assignment" {
            continue;
        }
        let lineno = line_of(stmt);

        // `x: T` / `x: T = v` record the annotation.
        if let Some(annotation) = expr.child_by_field_name("type") {
            if let Some(target) = expr
                .child_by_field_name("left")
                .filter(|l| l.kind() == "identifier")
            {
                module.set_variable(&text(target, src), lineno, Some(text(annotation, src)));
            }
            continue;
        }

        // `a = b = v` nests assignments on the right.
        let mut targets = Vec::new();
        let mut current = expr;
        let value = loop {
            if let Some(left) = current.child_by_field_name("left") {
                targets.push(left);
            }
            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                Some(right) => break Some(text(right, src)),
                None => break None,
            }
        };
        for target in targets.into_iter().filter(|t| t.kind() == "identifier") {
            module.set_variable(&text(target, src), lineno, value.clone());
        }
    }
}
