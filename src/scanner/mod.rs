//! Extraction of annotated declarations into the API model.
//!
//! Declarations are plain C++ headers in which exported classes are marked
//! with `NAPI_CLASS`, `NAPI_CLASS_SINGLETON` or `NAPI_CLASS_REF` and exported
//! methods with `NAPI`. Each marked declaration must fit on one line.

pub mod declarations;
pub mod error;
pub mod signature;
pub mod splitter;

use std::path::Path;

use napigen_model::ApiModel;

pub use declarations::{CLASS_MARKERS, declaration_lines, scan_files, scan_source};
pub use error::{ScanError, SignatureError, SignatureFault};
pub use signature::{ClassContext, FUNCTION_MARKER, parse_argument, parse_function};
pub use splitter::split_arguments;

/// Scans `paths` and freezes the result. `Ok(None)` means no annotated class
/// was found anywhere.
pub fn scan_model<P: AsRef<Path>>(paths: &[P]) -> Result<Option<ApiModel>, ScanError> {
    Ok(ApiModel::build(scan_files(paths)?)?)
}
