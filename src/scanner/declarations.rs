use std::fs;
use std::path::Path;

use napigen_model::{ApiClass, ClassKind, OrderedMap};
use napigen_span::Span;
use napigen_utils::{find_best_match, normalize_line_endings};
use tracing::{debug, warn};

use super::error::ScanError;
use super::signature::{ClassContext, FUNCTION_MARKER, parse_function};

/// Class markers and the kind each one declares. Every marker includes its
/// trailing space.
pub const CLASS_MARKERS: [(&str, ClassKind); 3] = [
    ("NAPI_CLASS ", ClassKind::Plain),
    ("NAPI_CLASS_SINGLETON ", ClassKind::Singleton),
    ("NAPI_CLASS_REF ", ClassKind::RefCounted),
];

const DOC_OPEN: &str = "/**";
const DOC_CLOSE: &str = "*/";

/// A trimmed, non-blank line of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub text: &'a str,
    /// 1-based line number in the file.
    pub number: usize,
    /// Position of `text` in the line-ending-normalized file.
    pub span: Span,
}

/// Trims every line of `normalized` and drops the blank ones. `normalized`
/// must already use `\n` line endings.
pub fn declaration_lines(normalized: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0usize;

    for (idx, raw) in normalized.split('\n').enumerate() {
        let text = raw.trim();
        if !text.is_empty() {
            let leading = raw.len() - raw.trim_start().len();
            let start = offset + leading;
            lines.push(SourceLine {
                text,
                number: idx + 1,
                span: Span::new(start, start + text.len()),
            });
        }
        offset += raw.len() + 1;
    }

    lines
}

/// Scans `paths` in order, accumulating every annotated class.
pub fn scan_files<P: AsRef<Path>>(paths: &[P]) -> Result<OrderedMap<ApiClass>, ScanError> {
    paths.iter().try_fold(OrderedMap::new(), |classes, path| {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        scan_source(&path.display().to_string(), &text, classes)
    })
}

/// Scans one declaration file's text into `classes`. The current-class context
/// starts empty for every file.
pub fn scan_source(
    source_id: &str,
    text: &str,
    classes: OrderedMap<ApiClass>,
) -> Result<OrderedMap<ApiClass>, ScanError> {
    let normalized = normalize_line_endings(text);
    let lines = declaration_lines(&normalized);
    debug!(file = source_id, lines = lines.len(), "scanning declarations");

    let state = (0..lines.len()).try_fold(ScanState::new(classes), |state, idx| {
        state.step(source_id, &lines, idx)
    })?;
    Ok(state.classes)
}

/// Scanner state folded over the lines of one file.
#[derive(Debug)]
struct ScanState {
    current: Option<ClassContext>,
    classes: OrderedMap<ApiClass>,
}

impl ScanState {
    fn new(classes: OrderedMap<ApiClass>) -> Self {
        Self {
            current: None,
            classes,
        }
    }

    fn step(
        mut self,
        source_id: &str,
        lines: &[SourceLine<'_>],
        idx: usize,
    ) -> Result<Self, ScanError> {
        let line = lines[idx];

        if let Some((marker, kind)) = class_marker(line.text) {
            let rest = &line.text[marker.len()..];
            let Some(name) = first_identifier(rest) else {
                warn!(file = source_id, line = line.number, "class marker without a class name");
                return Ok(self);
            };

            let class = ApiClass::new(name, kind, preceding_docs(lines, idx));
            if self.classes.upsert(class).is_some() {
                warn!(
                    file = source_id,
                    line = line.number,
                    class = name,
                    "class declared again, replacing the earlier declaration"
                );
            }
            self.current = Some(ClassContext::new(name, kind));
            return Ok(self);
        }

        if line.text.starts_with(FUNCTION_MARKER) {
            let Some(class) = &self.current else {
                return Err(ScanError::OrphanFunction {
                    source_id: source_id.to_string(),
                    line: line.number,
                    span: line.span,
                });
            };

            let function = parse_function(line.text, class, preceding_docs(lines, idx))
                .map_err(|error| ScanError::Signature {
                    source_id: source_id.to_string(),
                    line: line.number,
                    span: line.span,
                    error,
                })?;

            let key = function.key.clone();
            if let Some(owner) = self.classes.get_mut(&class.name) {
                if owner.functions.upsert(function).is_some() {
                    warn!(
                        file = source_id,
                        line = line.number,
                        function = %key,
                        "function declared again, replacing the earlier declaration"
                    );
                }
            }
            return Ok(self);
        }

        warn_on_marker_typo(source_id, &line);
        Ok(self)
    }
}

fn class_marker(line: &str) -> Option<(&'static str, ClassKind)> {
    CLASS_MARKERS
        .iter()
        .copied()
        .find(|(marker, _)| line.starts_with(marker))
}

fn first_identifier(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_alphanumeric() || c == '_')?;
    let rest = &text[start..];
    let len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Doc lines of a `/** ... */` block that ends right above `lines[idx]`.
fn preceding_docs(lines: &[SourceLine<'_>], idx: usize) -> Vec<String> {
    let Some(close) = idx.checked_sub(1).filter(|&close| lines[close].text == DOC_CLOSE) else {
        return Vec::new();
    };
    let Some(open) = lines[..close].iter().rposition(|line| line.text == DOC_OPEN) else {
        return Vec::new();
    };

    lines[open + 1..close]
        .iter()
        .map(|line| match line.text.strip_prefix('*') {
            Some(rest) => rest.trim().to_string(),
            None => line.text.to_string(),
        })
        .collect()
}

fn warn_on_marker_typo(source_id: &str, line: &SourceLine<'_>) {
    if !line.text.starts_with("NAPI") {
        return;
    }
    let token = line.text.split_whitespace().next().unwrap_or_default();
    let known = CLASS_MARKERS
        .iter()
        .map(|(marker, _)| marker.trim_end())
        .chain(std::iter::once(FUNCTION_MARKER.trim_end()))
        .map(str::to_string);

    if let Some(suggestion) = find_best_match(token, known) {
        warn!(
            file = source_id,
            line = line.number,
            "unknown marker `{token}` ignored, did you mean `{suggestion}`?"
        );
    }
}
