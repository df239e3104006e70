use napigen_model::{ApiFunction, ApiModel};
use serde::Deserialize;
use tracing::debug;

use super::template::{MarkerPolicy, Template, TemplateError};

/// Marker lines of the wrapper-header template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WrapperMarkers {
    pub includes: String,
    pub namespaces: String,
}

impl Default for WrapperMarkers {
    fn default() -> Self {
        Self {
            includes: "// GENERATOR_DD3D_API_INCLUDES".to_string(),
            namespaces: "// GENERATOR_DD3D_API_FUNCTIONS".to_string(),
        }
    }
}

/// Include path for auxiliary classes; `{}` stands for the class name.
pub const DEFAULT_INCLUDE_PATTERN: &str = "godot_cpp/classes/{}.hpp";

/// Emits the client header: per class a namespace of wrappers that resolve
/// their flat function on first call.
#[derive(Debug, Clone)]
pub struct WrapperHeaderEmitter {
    markers: WrapperMarkers,
    include_pattern: String,
    policy: MarkerPolicy,
}

impl Default for WrapperHeaderEmitter {
    fn default() -> Self {
        Self::new(
            WrapperMarkers::default(),
            DEFAULT_INCLUDE_PATTERN,
            MarkerPolicy::default(),
        )
    }
}

impl WrapperHeaderEmitter {
    pub fn new(
        markers: WrapperMarkers,
        include_pattern: impl Into<String>,
        policy: MarkerPolicy,
    ) -> Self {
        Self {
            markers,
            include_pattern: include_pattern.into(),
            policy,
        }
    }

    pub fn emit(
        &self,
        model: &ApiModel,
        template: &Template,
        include_classes: &[String],
    ) -> Result<String, TemplateError> {
        let mut output = template.clone();
        output.splice(
            &self.markers.includes,
            self.includes(include_classes),
            self.policy,
        )?;
        output.splice(&self.markers.namespaces, namespaces(model), self.policy)?;
        debug!(
            classes = model.classes().len(),
            includes = include_classes.len(),
            "wrapper header emitted"
        );
        Ok(output.render())
    }

    pub fn includes(&self, include_classes: &[String]) -> Vec<String> {
        include_classes
            .iter()
            .map(|class| format!("#include <{}>", self.include_pattern.replace("{}", class)))
            .collect()
    }
}

/// Namespace blocks for every class that exports at least one function,
/// preceded by a single blank line.
pub fn namespaces(model: &ApiModel) -> Vec<String> {
    let mut lines = vec![String::new()];
    for class in model.classes() {
        if class.functions.is_empty() {
            continue;
        }
        lines.extend(doc_block(&class.docs));
        lines.push(format!("namespace {} {{", class.name));
        for function in &class.functions {
            lines.extend(wrapper_function(function));
        }
        lines.push(format!("}} // namespace {}", class.name));
        lines.push(String::new());
    }
    lines
}

fn wrapper_function(function: &ApiFunction) -> Vec<String> {
    let mut lines = doc_block(&function.docs);
    let ret = &function.return_type;
    let key = &function.key;

    lines.push(format!(
        "static {ret} {}({}) {{",
        function.original_name,
        function.parameter_list()
    ));
    lines.push(format!(
        "\tstatic {ret}(*{key})({}) = nullptr;",
        function.type_list()
    ));

    let call_args = function.forward_list();
    if function.returns_void() {
        lines.push(format!("\tLOAD_AND_CALL_FUNC_POINTER({key}, {call_args});"));
    } else {
        let separator = if function.arguments.is_empty() { "" } else { ", " };
        lines.push(format!(
            "\tLOAD_AND_CALL_FUNC_POINTER_RET({key}, {}{separator}{call_args});",
            default_return_value(ret)
        ));
    }
    lines.push("}".to_string());
    lines.push(String::new());
    lines
}

/// What a wrapper returns when its flat function cannot be resolved.
pub fn default_return_value(return_type: &str) -> &'static str {
    if return_type.ends_with('*') || return_type.starts_with("Ref<") {
        "nullptr"
    } else {
        "{}"
    }
}

fn doc_block(docs: &[String]) -> Vec<String> {
    if docs.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(docs.len() + 2);
    lines.push("/**".to_string());
    lines.extend(docs.iter().map(|line| format!(" * {line}")));
    lines.push(" */".to_string());
    lines
}
