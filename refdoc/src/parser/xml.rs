//! MrDocs XML walker.
//!
//! The schema is shallow and fixed, so this is a direct walk over the
//! `roxmltree` DOM rather than a general-purpose mapper. Documentation text
//! always sits at `<doc><TAG><text>...</text></TAG></doc>` under the
//! documented element.

use crate::model::*;
use anyhow::{Context, Result};
use roxmltree::{Document, Node, NodeId, ParsingOptions};
use std::collections::HashSet;

/// Parse one XML document into namespace fragments, in discovery order.
///
/// The same namespace may appear more than once in the result; callers merge
/// fragments by name (see [`super::merge`]).
pub fn parse_str(xml: &str) -> Result<Vec<Namespace>> {
    // MrDocs output may carry a `<!DOCTYPE mrdocs ...>` header.
    let options = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options).context("malformed XML")?;
    let root = doc.root_element();
    let mut walker = Walker::default();
    let mut fragments = Vec::new();

    // `descendants()` includes the root, so a file whose root element is the
    // namespace itself is handled too.
    for node in root.descendants().filter(|n| n.has_tag_name("namespace")) {
        if let Some(namespace) = walker.namespace(node) {
            fragments.push(namespace);
        }
    }

    // Whatever no namespace claimed is filed under its own `namespace`
    // attribute, or the global namespace.
    for node in root.descendants().filter(|n| n.has_tag_name("class")) {
        if !walker.claim(node) {
            continue;
        }
        if let Some(mut cls) = walker.class(node) {
            cls.namespace = namespace_attr(node);
            let mut namespace = Namespace::new(cls.namespace.clone());
            namespace.classes.push(cls);
            fragments.push(namespace);
        }
    }

    for node in root.descendants().filter(|n| n.has_tag_name("function")) {
        if !walker.claim(node) {
            continue;
        }
        if let Some(mut func) = function(node) {
            func.namespace = namespace_attr(node);
            let mut namespace = Namespace::new(func.namespace.clone());
            namespace.functions.push(func);
            fragments.push(namespace);
        }
    }

    Ok(fragments)
}

/// Tracks which class/function elements have already been turned into model
/// entries so later passes don't count them twice.
#[derive(Default)]
struct Walker {
    consumed: HashSet<NodeId>,
}

impl Walker {
    /// Mark `node` as consumed. Returns false if it already was.
    fn claim(&mut self, node: Node) -> bool {
        self.consumed.insert(node.id())
    }

    fn namespace(&mut self, node: Node) -> Option<Namespace> {
        let name = element_name(node)?;
        let mut namespace = Namespace {
            name: name.clone(),
            brief: doc_text(node, "brief"),
            description: doc_text(node, "description"),
            ..Default::default()
        };

        for child in children(node, "class") {
            self.claim(child);
            if let Some(mut cls) = self.class(child) {
                cls.namespace = name.clone();
                namespace.classes.push(cls);
            }
        }

        for child in children(node, "function") {
            self.claim(child);
            if let Some(mut func) = function(child) {
                func.namespace = name.clone();
                namespace.functions.push(func);
            }
        }

        Some(namespace)
    }

    fn class(&mut self, node: Node) -> Option<Class> {
        // Only direct children: functions of nested types belong to those
        // types. They are claimed even when the class itself is skipped.
        let mut methods = Vec::new();
        for child in children(node, "function") {
            self.claim(child);
            if let Some(method) = function(child) {
                methods.push(method);
            }
        }

        let name = element_name(node)?;

        let template_params: Vec<String> = descendants(node, "template-param")
            .filter_map(element_name)
            .collect();

        let base_classes = descendants(node, "base")
            .filter_map(|base| {
                non_empty(base.attribute("name"))
                    .or_else(|| non_empty(base.text().map(str::trim)))
                    .map(str::to_string)
            })
            .collect();

        let members = descendants(node, "member").filter_map(member).collect();

        Some(Class {
            name,
            brief: doc_text(node, "brief"),
            description: doc_text(node, "description"),
            namespace: String::new(),
            methods,
            members,
            base_classes,
            is_template: !template_params.is_empty(),
            template_params,
        })
    }
}

fn function(node: Node) -> Option<Function> {
    let name = element_name(node)?;

    let return_type = child(node, "return")
        .and_then(|r| child(r, "type"))
        .and_then(|t| non_empty(t.attribute("name")))
        .unwrap_or(VOID)
        .to_string();

    let template_params = descendants(node, "template-param")
        .filter_map(element_name)
        .collect();

    let mut parameters: Vec<Parameter> = children(node, "param")
        .map(|param| Parameter {
            name: param.attribute("name").unwrap_or_default().to_string(),
            type_name: child(param, "type").map(type_name).unwrap_or_default(),
            description: String::new(),
        })
        .collect();

    // Descriptions live in a separate doc block, matched by parameter name.
    if let Some(doc) = child(node, "doc") {
        for param in parameters.iter_mut().filter(|p| !p.name.is_empty()) {
            param.description = children(doc, "param")
                .filter(|d| d.attribute("name") == Some(param.name.as_str()))
                .find_map(|d| non_empty(child(d, "text").and_then(|t| t.text()).map(str::trim)))
                .unwrap_or_default()
                .to_string();
        }
    }

    Some(Function {
        name,
        brief: doc_text(node, "brief"),
        description: doc_text(node, "description"),
        return_type,
        return_description: doc_text(node, "returns"),
        parameters,
        is_static: flag(node, "static"),
        is_const: flag(node, "const"),
        is_noexcept: flag(node, "noexcept"),
        template_params,
        access: Access::from_attr(node.attribute("access")),
        namespace: String::new(),
    })
}

fn member(node: Node) -> Option<Member> {
    let name = element_name(node)?;
    let type_name = child(node, "type")
        .and_then(|t| non_empty(t.text().map(str::trim)).or_else(|| non_empty(t.attribute("name"))))
        .unwrap_or_default()
        .to_string();

    Some(Member {
        name,
        type_name,
        brief: doc_text(node, "brief"),
        description: doc_text(node, "description"),
        access: Access::from_attr(node.attribute("access")),
    })
}

/// Spelled-out type of a `<type>` element.
///
/// Named types use their `name`; pointers are rebuilt from `pointee-type` as
/// `"{cv} {name}*"`.
fn type_name(node: Node) -> String {
    if let Some(name) = non_empty(node.attribute("name")) {
        return name.to_string();
    }
    if node.attribute("class") == Some("pointer") {
        if let Some(pointee) = child(node, "pointee-type") {
            let cv = pointee.attribute("cv-qualifiers").unwrap_or_default();
            let base = pointee.attribute("name").unwrap_or(VOID);
            return format!("{} {}*", cv, base).trim().to_string();
        }
    }
    String::new()
}

/// Concatenated `<text>` leaves of `<doc><TAG>`, or "" when absent.
fn doc_text(node: Node, tag: &str) -> String {
    let Some(target) = child(node, "doc").and_then(|doc| child(doc, tag)) else {
        return String::new();
    };
    descendants(target, "text")
        .filter_map(|t| non_empty(t.text().map(str::trim)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `name` attribute, falling back to a `<name>` child's text.
fn element_name(node: Node) -> Option<String> {
    non_empty(node.attribute("name"))
        .or_else(|| non_empty(child(node, "name").and_then(|n| n.text())))
        .map(str::to_string)
}

fn namespace_attr(node: Node) -> String {
    non_empty(node.attribute("namespace"))
        .unwrap_or(GLOBAL_NAMESPACE)
        .to_string()
}

/// Boolean attribute: true only for a case-insensitive "true".
fn flag(node: Node, attr: &str) -> bool {
    node.attribute(attr)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name(tag))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |c| c.has_tag_name(tag))
}

/// Descendant elements named `tag`, excluding `node` itself.
fn descendants<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants().skip(1).filter(move |c| c.has_tag_name(tag))
}
