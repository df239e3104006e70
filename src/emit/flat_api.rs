use napigen_model::{ApiClass, ApiFunction, ApiModel};
use serde::Deserialize;
use tracing::debug;

use super::template::{MarkerPolicy, Template, TemplateError};

/// Marker lines of the flat-API template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlatApiMarkers {
    pub functions: String,
    pub registrations: String,
}

impl Default for FlatApiMarkers {
    fn default() -> Self {
        Self {
            functions: "// GENERATOR_DD3D_FUNCTIONS_DEFINES".to_string(),
            registrations: "// GENERATOR_DD3D_FUNCTIONS_REGISTERS".to_string(),
        }
    }
}

/// Emits the C-linkage side: one free function per API method plus the table
/// that registers them by name.
#[derive(Debug, Clone, Default)]
pub struct FlatApiEmitter {
    markers: FlatApiMarkers,
    policy: MarkerPolicy,
}

impl FlatApiEmitter {
    pub fn new(markers: FlatApiMarkers, policy: MarkerPolicy) -> Self {
        Self { markers, policy }
    }

    /// Splices definitions and registrations into a copy of `template`. Either
    /// marker missing fails the whole emission.
    pub fn emit(&self, model: &ApiModel, template: &Template) -> Result<String, TemplateError> {
        let mut output = template.clone();
        output.splice(&self.markers.functions, definitions(model), self.policy)?;
        output.splice(&self.markers.registrations, registrations(model), self.policy)?;
        debug!(functions = model.function_count(), "flat api emitted");
        Ok(output.render())
    }
}

/// Flat definitions of every function, each followed by a blank line.
pub fn definitions(model: &ApiModel) -> Vec<String> {
    let mut lines = Vec::with_capacity(model.function_count() * 4);
    for (class, function) in model.functions() {
        lines.push(format!(
            "{} {}({}) {{",
            function.return_type,
            function.key,
            function.parameter_list()
        ));
        if let Some(body) = dispatch(class, function) {
            lines.push(body);
        }
        lines.push("}".to_string());
        lines.push(String::new());
    }
    lines
}

/// Singletons forward to the global accessor; instance classes get their body
/// from the runtime binding, so they are emitted empty.
fn dispatch(class: &ApiClass, function: &ApiFunction) -> Option<String> {
    if !class.is_singleton() {
        return None;
    }

    let call = format!(
        "{}::get_singleton()->{}({})",
        class.name,
        function.original_name,
        function.forward_list()
    );
    Some(if function.returns_void() {
        format!("\t{call};")
    } else {
        format!("\treturn {call};")
    })
}

pub fn registrations(model: &ApiModel) -> Vec<String> {
    model
        .functions()
        .map(|(_, function)| format!("\t\tADD_FUNC({});", function.key))
        .collect()
}
