use std::fmt;
use std::path::PathBuf;

use napigen_model::HashError;
use napigen_span::Span;
use napigen_utils::Diagnostic;
use thiserror::Error;

/// What exactly is wrong with a malformed signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFault {
    ExcessCloser,
    UnclosedOpener,
    MissingFunctionName,
    MissingParameterList,
}

impl fmt::Display for SignatureFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExcessCloser => "there are more closing brackets than opening ones",
            Self::UnclosedOpener => "there are more opening brackets than closing ones",
            Self::MissingFunctionName => "no `name(` found",
            Self::MissingParameterList => "no closing `)` for the parameter list",
        })
    }
}

/// Failures of the splitter and the signature parser, carrying the raw text
/// they choked on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature, {fault}: `{text}`")]
    MalformedSignature { fault: SignatureFault, text: String },
    #[error("malformed argument, no argument name found: `{text}`")]
    MalformedArgument { text: String },
}

impl SignatureError {
    pub fn malformed(fault: SignatureFault, text: &str) -> Self {
        Self::MalformedSignature {
            fault,
            text: text.to_string(),
        }
    }

    fn help(&self) -> &'static str {
        match self {
            Self::MalformedSignature {
                fault: SignatureFault::ExcessCloser | SignatureFault::UnclosedOpener,
                ..
            } => "`<` and `>` count as brackets, so comparisons are not allowed in default values",
            Self::MalformedSignature { .. } => {
                "annotated functions must be declared on a single line as `NAPI <type> <name>(<args>)`"
            }
            Self::MalformedArgument { .. } => {
                "every argument needs a trailing name, optionally followed by `= <default>`"
            }
        }
    }
}

/// Hard failures of a declaration scan. Any of these aborts generation before
/// an output is written.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{source_id}:{line}: {error}")]
    Signature {
        source_id: String,
        line: usize,
        span: Span,
        error: SignatureError,
    },
    #[error("{source_id}:{line}: function marker before any class marker")]
    OrphanFunction {
        source_id: String,
        line: usize,
        span: Span,
    },
    #[error("failed to read declarations from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to hash the api model")]
    Model(#[from] HashError),
}

impl ScanError {
    /// The declaration file the error points into, if it points anywhere.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::Signature { source_id, .. } | Self::OrphanFunction { source_id, .. } => {
                Some(source_id)
            }
            Self::Io { .. } | Self::Model(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Signature {
                source_id,
                span,
                error,
                ..
            } => Some(
                Diagnostic::error(source_id.as_str(), *span, error.to_string())
                    .with_label("in this declaration")
                    .with_help(error.help()),
            ),
            Self::OrphanFunction {
                source_id, span, ..
            } => Some(
                Diagnostic::error(
                    source_id.as_str(),
                    *span,
                    "function marker before any class marker",
                )
                .with_label("no enclosing NAPI_CLASS")
                .with_help(
                    "declare the class with NAPI_CLASS, NAPI_CLASS_SINGLETON or NAPI_CLASS_REF first",
                ),
            ),
            Self::Io { .. } | Self::Model(_) => None,
        }
    }
}
