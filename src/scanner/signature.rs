use napigen_model::{ApiArgument, ApiFunction, ClassKind};

use super::error::{SignatureError, SignatureFault};
use super::splitter::split_arguments;

/// Prefix of an annotated function declaration line.
pub const FUNCTION_MARKER: &str = "NAPI ";

/// Leading parameter of every flat function on a non-singleton class.
pub const INSTANCE_ARGUMENT: &str = "void *inst";

/// The class a function line belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassContext {
    pub name: String,
    pub kind: ClassKind,
}

impl ClassContext {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    fn self_reference(&self) -> String {
        format!("Ref<{}>", self.name)
    }
}

/// Parses one `NAPI <return> <name>(<args>)` line into a flat function of
/// `class`.
pub fn parse_function(
    line: &str,
    class: &ClassContext,
    docs: Vec<String>,
) -> Result<ApiFunction, SignatureError> {
    let (name_start, name_end) = find_function_name(line)
        .ok_or_else(|| SignatureError::malformed(SignatureFault::MissingFunctionName, line))?;
    let original_name = &line[name_start..name_end];

    let declared_return = line[..name_start].trim();
    let declared_return = declared_return
        .strip_prefix(FUNCTION_MARKER.trim_end())
        .unwrap_or(declared_return)
        .trim();

    let self_return = class.kind.is_ref_counted() && declared_return == class.self_reference();
    let return_type = if self_return { "void" } else { declared_return };

    let open = line.find('(').unwrap_or(name_end);
    let close = line
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| SignatureError::malformed(SignatureFault::MissingParameterList, line))?;

    let mut arguments = Vec::new();
    if !class.kind.is_singleton() {
        arguments.push(parse_argument(INSTANCE_ARGUMENT)?);
    }
    for raw in split_arguments(&line[open + 1..close])? {
        arguments.push(parse_argument(&raw)?);
    }

    Ok(ApiFunction {
        key: format!("{}_{original_name}", class.name),
        original_name: original_name.to_string(),
        return_type: return_type.to_string(),
        self_return,
        arguments,
        docs,
    })
}

/// Splits one argument into type, name and optional default value.
///
/// The name is the first identifier followed by `=`, or failing that the
/// identifier the argument ends with.
pub fn parse_argument(raw: &str) -> Result<ApiArgument, SignatureError> {
    let raw = raw.trim();

    let defaulted = identifier_runs(raw).find_map(|(start, end)| {
        let rest = &raw[end..];
        let trimmed = rest.trim_start();
        trimmed
            .starts_with('=')
            .then(|| (start, end, end + (rest.len() - trimmed.len())))
    });

    if let Some((start, end, equals)) = defaulted {
        return Ok(
            ApiArgument::new(&raw[start..end], raw[..start].trim())
                .with_default(raw[equals + 1..].trim()),
        );
    }

    match identifier_runs(raw).last() {
        Some((start, end)) if end == raw.len() => {
            Ok(ApiArgument::new(&raw[start..end], raw[..start].trim()))
        }
        _ => Err(SignatureError::MalformedArgument {
            text: raw.to_string(),
        }),
    }
}

/// Byte range of the first identifier directly followed (modulo whitespace)
/// by `(`.
fn find_function_name(line: &str) -> Option<(usize, usize)> {
    identifier_runs(line).find(|&(_, end)| line[end..].trim_start().starts_with('('))
}

const fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Maximal runs of identifier characters, as byte ranges.
fn identifier_runs(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let bytes = text.as_bytes();
    let mut idx = 0usize;
    std::iter::from_fn(move || {
        while idx < bytes.len() && !is_identifier_byte(bytes[idx]) {
            idx += 1;
        }
        if idx >= bytes.len() {
            return None;
        }
        let start = idx;
        while idx < bytes.len() && is_identifier_byte(bytes[idx]) {
            idx += 1;
        }
        Some((start, idx))
    })
}
