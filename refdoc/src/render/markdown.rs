//! Starlight-flavored markdown renderer.
//!
//! One page per class, named after the class, plus `functions.md` for the
//! namespace's free functions. Every page opens with a `title`/`description`
//! frontmatter block, which Starlight requires.

use crate::model::*;
use crate::render::Page;

/// Namespace documented when none is given on the command line.
pub const DEFAULT_NAMESPACE: &str = "allure";

pub const FUNCTIONS_PAGE: &str = "functions.md";
pub const INDEX_PAGE: &str = "index.md";

/// Renders the pages of a single namespace; every other namespace in the
/// model is ignored.
pub struct MarkdownGenerator {
    namespace: String,
    index: bool,
}

impl Default for MarkdownGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl MarkdownGenerator {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            index: false,
        }
    }

    /// Also produce an `index.md` overview of the namespace.
    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn generate(&self, model: &Model) -> Vec<Page> {
        let Some(namespace) = model.get(&self.namespace) else {
            return Vec::new();
        };

        let mut pages = Vec::new();
        if self.index {
            pages.push(Page::new(INDEX_PAGE, render_namespace_index(namespace)));
        }
        for cls in &namespace.classes {
            pages.push(Page::new(format!("{}.md", cls.name), render_class(cls)));
        }
        if !namespace.functions.is_empty() {
            pages.push(Page::new(
                FUNCTIONS_PAGE,
                render_functions_page(&namespace.name, &namespace.functions),
            ));
        }
        pages
    }
}

fn frontmatter(title: &str, description: &str) -> String {
    format!("---\ntitle: {}\ndescription: {}\n---\n\n", title, description)
}

fn template_line(params: &[String]) -> String {
    let params: Vec<String> = params.iter().map(|p| format!("typename {}", p)).collect();
    format!("template <{}>\n", params.join(", "))
}

pub fn render_class(cls: &Class) -> String {
    let mut out = frontmatter(&cls.name, &format!("API reference for the {} class", cls.name));

    if !cls.brief.is_empty() {
        out.push_str(&format!("{}\n\n", cls.brief));
    }

    if cls.is_template {
        out.push_str("```cpp\n");
        out.push_str(&template_line(&cls.template_params));
        out.push_str(&format!("class {}\n", cls.name));
        out.push_str("```\n\n");
    }

    if !cls.description.is_empty() {
        out.push_str("## Description\n\n");
        out.push_str(&format!("{}\n\n", cls.description));
    }

    if !cls.base_classes.is_empty() {
        out.push_str("## Inheritance\n\n");
        for base in &cls.base_classes {
            out.push_str(&format!("- Inherits from: `{}`\n", base));
        }
        out.push('\n');
    }

    let methods: Vec<&Function> = cls.public_methods().collect();
    if !methods.is_empty() {
        out.push_str("## Public Methods\n\n");
        for method in methods {
            out.push_str(&render_function(method, true));
            out.push('\n');
        }
    }

    let members: Vec<&Member> = cls.public_members().collect();
    if !members.is_empty() {
        out.push_str("## Public Members\n\n");
        for member in members {
            out.push_str(&render_member(member));
            out.push('\n');
        }
    }

    out
}

/// Render one function or method. `static` is only shown for methods.
pub fn render_function(func: &Function, is_method: bool) -> String {
    let mut out = format!("### {}\n\n", func.name);

    if !func.brief.is_empty() {
        out.push_str(&format!("{}\n\n", func.brief));
    }

    out.push_str("```cpp\n");
    out.push_str(&signature(func, is_method));
    out.push_str("\n```\n\n");

    if !func.description.is_empty() {
        out.push_str(&format!("{}\n\n", func.description));
    }

    if !func.parameters.is_empty() {
        out.push_str("**Parameters:**\n\n");
        out.push_str("| Name | Type | Description |\n");
        out.push_str("|------|------|-------------|\n");
        for param in &func.parameters {
            let desc: &str = if param.description.is_empty() {
                "No description"
            } else {
                &param.description
            };
            out.push_str(&format!(
                "| `{}` | `{}` | {} |\n",
                param.name,
                param.type_name,
                desc.replace('|', "\\|")
            ));
        }
        out.push('\n');
    }

    if func.returns_value() {
        out.push_str("**Returns:**\n\n");
        if func.return_description.is_empty() {
            out.push_str(&format!("Returns a value of type `{}`\n\n", func.return_type));
        } else {
            out.push_str(&format!("{}\n\n", func.return_description));
        }
    }

    out
}

/// `template <...>\n[static ]RET NAME(T a, U b)[ const][ noexcept]`
fn signature(func: &Function, is_method: bool) -> String {
    let mut sig = String::new();
    if !func.template_params.is_empty() {
        sig.push_str(&template_line(&func.template_params));
    }
    if func.is_static && is_method {
        sig.push_str("static ");
    }

    let params: Vec<String> = func
        .parameters
        .iter()
        .map(|p| {
            if p.name.is_empty() {
                p.type_name.clone()
            } else {
                format!("{} {}", p.type_name, p.name)
            }
        })
        .collect();
    sig.push_str(&format!("{} {}({})", func.return_type, func.name, params.join(", ")));

    if func.is_const {
        sig.push_str(" const");
    }
    if func.is_noexcept {
        sig.push_str(" noexcept");
    }
    sig
}

pub fn render_member(member: &Member) -> String {
    let mut out = format!("### `{}`\n\n", member.name);
    out.push_str(&format!("```cpp\n{} {}\n```\n\n", member.type_name, member.name));

    if !member.brief.is_empty() {
        out.push_str(&format!("{}\n\n", member.brief));
    }
    if !member.description.is_empty() {
        out.push_str(&format!("{}\n\n", member.description));
    }
    out
}

pub fn render_functions_page(namespace: &str, functions: &[Function]) -> String {
    let mut out = frontmatter("Functions", "Namespace-level utility functions");
    out.push_str(&format!(
        "Utility functions available in the `{}` namespace.\n\n",
        namespace
    ));
    for func in functions {
        out.push_str(&render_function(func, false));
        out.push('\n');
    }
    out
}

/// Overview page: namespace docs, a linked class list and its free functions.
pub fn render_namespace_index(namespace: &Namespace) -> String {
    let mut out = frontmatter(
        &format!("{} namespace", namespace.name),
        &format!("API reference for the {} namespace", namespace.name),
    );

    if !namespace.brief.is_empty() {
        out.push_str(&format!("{}\n\n", namespace.brief));
    }
    if !namespace.description.is_empty() {
        out.push_str(&format!("{}\n\n", namespace.description));
    }

    if !namespace.classes.is_empty() {
        out.push_str("## Classes\n\n");
        for cls in &namespace.classes {
            let brief: &str = if cls.brief.is_empty() {
                "No description available"
            } else {
                &cls.brief
            };
            out.push_str(&format!("- [`{0}`]({0}.md) - {1}\n", cls.name, brief));
        }
        out.push('\n');
    }

    if !namespace.functions.is_empty() {
        out.push_str("## Functions\n\n");
        for func in &namespace.functions {
            out.push_str(&render_function(func, false));
            out.push('\n');
        }
    }

    out
}
