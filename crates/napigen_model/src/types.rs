use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::hash::{HashError, content_hash};
use crate::ordered::{Keyed, OrderedMap};

/// One parameter of a flat function.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiArgument {
    pub name: String,
    /// Type text as written, reference qualifiers included.
    #[serde(rename = "type")]
    pub declared_type: String,
    /// `declared_type` without `&`, safe to pass across the module boundary.
    #[serde(rename = "c_type")]
    pub normalized_type: String,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ApiArgument {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Self {
            name: name.into(),
            normalized_type: strip_references(&declared_type),
            declared_type,
            default_value: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// `type name`, as it appears in a parameter list.
    pub fn parameter(&self) -> String {
        format!("{} {}", self.declared_type, self.name)
    }
}

fn strip_references(declared_type: &str) -> String {
    declared_type.replace('&', "").trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiFunction {
    /// `ClassName_functionName`; also the exported flat symbol name.
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "name")]
    pub original_name: String,
    #[serde(rename = "return")]
    pub return_type: String,
    /// Set when a `Ref<Self>` return was rewritten to `void`.
    pub self_return: bool,
    #[serde(rename = "args")]
    pub arguments: Vec<ApiArgument>,
    pub docs: Vec<String>,
}

impl ApiFunction {
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Comma-separated `type name` list.
    pub fn parameter_list(&self) -> String {
        self.arguments
            .iter()
            .map(ApiArgument::parameter)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated argument names, for forwarding calls.
    pub fn forward_list(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| arg.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-separated declared types, for function-pointer signatures.
    pub fn type_list(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| arg.declared_type.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Keyed for ApiFunction {
    fn key(&self) -> &str {
        &self.key
    }
}

/// How instances of a class are reached from the flat API. Fixed by the class
/// marker; the variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassKind {
    /// Methods take an explicit instance handle.
    #[default]
    Plain,
    /// Methods dispatch through `Class::get_singleton()` and take no handle.
    Singleton,
    /// Like `Plain`, and methods returning `Ref<Class>` are chainable.
    RefCounted,
}

impl ClassKind {
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }

    pub const fn is_ref_counted(self) -> bool {
        matches!(self, Self::RefCounted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClass {
    pub name: String,
    pub kind: ClassKind,
    pub functions: OrderedMap<ApiFunction>,
    pub docs: Vec<String>,
}

impl ApiClass {
    pub fn new(name: impl Into<String>, kind: ClassKind, docs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            functions: OrderedMap::new(),
            docs,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.kind.is_singleton()
    }

    pub fn is_ref_counted(&self) -> bool {
        self.kind.is_ref_counted()
    }
}

impl Keyed for ApiClass {
    fn key(&self) -> &str {
        &self.name
    }
}

impl Serialize for ApiClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiClass", 4)?;
        state.serialize_field("functions", &self.functions)?;
        state.serialize_field("singleton", &self.is_singleton())?;
        state.serialize_field("refcounted", &self.is_ref_counted())?;
        state.serialize_field("docs", &self.docs)?;
        state.end()
    }
}

/// The frozen result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiModel {
    classes: OrderedMap<ApiClass>,
    content_hash: String,
}

impl ApiModel {
    /// Freezes `classes` and hashes them. Returns `None` when nothing was
    /// declared, which callers treat as "nothing to generate" rather than a
    /// failure.
    pub fn build(classes: OrderedMap<ApiClass>) -> Result<Option<Self>, HashError> {
        if classes.is_empty() {
            return Ok(None);
        }

        let content_hash = content_hash(&classes)?;
        tracing::debug!(
            classes = classes.len(),
            functions = classes.iter().map(|c| c.functions.len()).sum::<usize>(),
            hash = %content_hash,
            "api model built"
        );

        Ok(Some(Self {
            classes,
            content_hash,
        }))
    }

    pub fn classes(&self) -> &OrderedMap<ApiClass> {
        &self.classes
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn function_count(&self) -> usize {
        self.classes.iter().map(|class| class.functions.len()).sum()
    }

    /// Every function with its owning class, in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = (&ApiClass, &ApiFunction)> {
        self.classes
            .iter()
            .flat_map(|class| class.functions.iter().map(move |function| (class, function)))
    }
}
