//! Document model for parsed API reference data. Format-agnostic.

use std::collections::BTreeMap;

/// Namespace assigned to classes and functions that name no namespace.
pub const GLOBAL_NAMESPACE: &str = "global";

/// Return type used when the XML gives none.
pub const VOID: &str = "void";

/// All namespaces found in a run, keyed by name.
pub type Model = BTreeMap<String, Namespace>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub brief: String,
    pub description: String,
    pub classes: Vec<Class>,
    /// Namespace-level functions only; methods live on their class.
    pub functions: Vec<Function>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A C++ class or struct.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub brief: String,
    pub description: String,
    pub namespace: String,
    pub methods: Vec<Function>,
    pub members: Vec<Member>,
    pub base_classes: Vec<String>,
    pub is_template: bool,
    pub template_params: Vec<String>,
}

impl Class {
    pub fn public_methods(&self) -> impl Iterator<Item = &Function> {
        self.methods.iter().filter(|m| m.access == Access::Public)
    }

    pub fn public_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.access == Access::Public)
    }
}

/// A free function or a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub brief: String,
    pub description: String,
    pub return_type: String,
    /// Text of the `returns` doc block, empty when absent.
    pub return_description: String,
    pub parameters: Vec<Parameter>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_noexcept: bool,
    pub template_params: Vec<String>,
    pub access: Access,
    pub namespace: String,
}

impl Default for Function {
    fn default() -> Self {
        Self {
            name: String::new(),
            brief: String::new(),
            description: String::new(),
            return_type: VOID.to_string(),
            return_description: String::new(),
            parameters: Vec::new(),
            is_static: false,
            is_const: false,
            is_noexcept: false,
            template_params: Vec::new(),
            access: Access::Public,
            namespace: String::new(),
        }
    }
}

impl Function {
    pub fn returns_value(&self) -> bool {
        self.return_type != VOID
    }
}

/// A data member of a class.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub type_name: String,
    pub brief: String,
    pub description: String,
    pub access: Access,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parameter {
    /// May be empty for unnamed parameters.
    pub name: String,
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

impl Access {
    /// Parse an `access` attribute. Missing means public; anything that is
    /// not exactly `public` or `protected` is treated as private so it never
    /// leaks into the rendered reference.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("public") => Access::Public,
            Some("protected") => Access::Protected,
            Some(_) => Access::Private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_from_attr() {
        assert_eq!(Access::from_attr(None), Access::Public);
        assert_eq!(Access::from_attr(Some("public")), Access::Public);
        assert_eq!(Access::from_attr(Some("protected")), Access::Protected);
        assert_eq!(Access::from_attr(Some("private")), Access::Private);
        assert_eq!(Access::from_attr(Some("Public")), Access::Private);
    }

    #[test]
    fn function_defaults_to_void() {
        let f = Function::default();
        assert_eq!(f.return_type, "void");
        assert!(!f.returns_value());
        assert_eq!(f.access, Access::Public);
    }

    #[test]
    fn public_filters() {
        let cls = Class {
            methods: vec![
                Function { name: "a".into(), ..Default::default() },
                Function { name: "b".into(), access: Access::Private, ..Default::default() },
            ],
            members: vec![Member { name: "m".into(), access: Access::Protected, ..Default::default() }],
            ..Default::default()
        };
        assert_eq!(cls.public_methods().map(|m| m.name.as_str()).collect::<Vec<_>>(), ["a"]);
        assert_eq!(cls.public_members().count(), 0);
    }
}
