//! Compile selection trees into GraphQL query text.
//!
//! Output follows a single-line grammar:
//! `name(arg: value, ...) { child child ... }`. Serialization never fails;
//! an argument value that does not fit its declared type renders as `null`.

use crate::selection::{SelectionArgument, SelectionNode, ValueExpr};
use crate::type_ref::TypeKind;

/// Compile `node` and its filled children into query text.
pub fn serialize(node: &SelectionNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &SelectionNode) {
    if node.is_object && node.is_fragment() {
        out.push_str("... on ");
    }
    out.push_str(&node.name);

    if !node.arguments.is_empty() {
        let args: Vec<String> = node.arguments.iter().map(render_argument).collect();
        out.push('(');
        out.push_str(&args.join(", "));
        out.push(')');
    }

    if node.is_object {
        let children: Vec<String> = node.filled_children().map(serialize).collect();
        if children.is_empty() {
            out.push_str(" { }");
        } else {
            out.push_str(" { ");
            out.push_str(&children.join(" "));
            out.push_str(" }");
        }
    }
}

fn render_argument(arg: &SelectionArgument) -> String {
    format!(
        "{}: {}",
        arg.name,
        render_value_as(arg.value.as_ref(), &arg.type_string, arg.base_kind)
    )
}

/// How a declared type string coerces argument values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category<'a> {
    /// `[T]`, carrying the element type string.
    List(&'a str),
    Int,
    Float,
    Text,
    Boolean,
    /// Enums, input objects and custom scalars.
    Named,
}

fn categorize(type_string: &str) -> Category<'_> {
    let ty = type_string.strip_suffix('!').unwrap_or(type_string);
    if let Some(inner) = ty.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Category::List(inner);
    }
    match ty {
        "Int" => Category::Int,
        "Float" => Category::Float,
        "String" | "ID" => Category::Text,
        "Boolean" => Category::Boolean,
        _ => Category::Named,
    }
}

/// Render `value` as a GraphQL literal of the declared `type_string`,
/// without knowing the kind of its base type.
///
/// Text for a named type is quoted; use [`render_value_as`] with
/// [`TypeKind::Enum`] to emit enum values bare.
pub fn render_value(value: Option<&ValueExpr>, type_string: &str) -> String {
    render_value_as(value, type_string, None)
}

/// Render `value` as a GraphQL literal of the declared `type_string` whose
/// base type has kind `base_kind`.
pub fn render_value_as(
    value: Option<&ValueExpr>,
    type_string: &str,
    base_kind: Option<TypeKind>,
) -> String {
    let Some(value) = value else {
        return "null".to_string();
    };
    if matches!(value, ValueExpr::Null) {
        return "null".to_string();
    }

    match categorize(type_string) {
        Category::Text => match value {
            ValueExpr::Text(s) => quote(s),
            ValueExpr::Number(n) => quote(&n.to_string()),
            ValueExpr::Boolean(b) => quote(&b.to_string()),
            _ => "null".to_string(),
        },
        Category::Int => match value {
            ValueExpr::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
            ValueExpr::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| n.to_string())
                .unwrap_or_else(|_| "null".to_string()),
            _ => "null".to_string(),
        },
        Category::Float => match value {
            ValueExpr::Number(n) => n.to_string(),
            ValueExpr::Text(s) => serde_json::from_str::<serde_json::Number>(s.trim())
                .map(|n| n.to_string())
                .unwrap_or_else(|_| "null".to_string()),
            _ => "null".to_string(),
        },
        Category::Boolean => match value {
            ValueExpr::Boolean(b) => b.to_string(),
            ValueExpr::Text(s) => s
                .trim()
                .parse::<bool>()
                .map(|b| b.to_string())
                .unwrap_or_else(|_| "null".to_string()),
            _ => "null".to_string(),
        },
        Category::List(inner) => match value {
            ValueExpr::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| render_value_as(Some(item), inner, base_kind))
                    .collect();
                format!("[{}]", items.join(", "))
            }
            single => render_value_as(Some(single), inner, base_kind),
        },
        Category::Named => match value {
            ValueExpr::Text(s) if base_kind == Some(TypeKind::Enum) && is_enum_value(s) => {
                s.clone()
            }
            other => render_untyped(other),
        },
    }
}

/// Render a value with no declared type to guide coercion.
fn render_untyped(value: &ValueExpr) -> String {
    match value {
        ValueExpr::Null => "null".to_string(),
        ValueExpr::Boolean(b) => b.to_string(),
        ValueExpr::Number(n) => n.to_string(),
        ValueExpr::Text(s) => quote(s),
        ValueExpr::List(items) => {
            let items: Vec<String> = items.iter().map(render_untyped).collect();
            format!("[{}]", items.join(", "))
        }
        ValueExpr::Object(fields) if fields.keys().all(|k| is_name(k)) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k, render_untyped(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        ValueExpr::Object(_) => "null".to_string(),
    }
}

fn quote(s: &str) -> String {
    // JSON string escapes are valid GraphQL string escapes.
    serde_json::Value::String(s.to_string()).to_string()
}

/// Whether `s` matches the GraphQL `Name` grammar.
fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
    starts_ok && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn is_enum_value(s: &str) -> bool {
    is_name(s) && !matches!(s, "true" | "false" | "null")
}

impl std::fmt::Display for SelectionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&serialize(self))
    }
}
