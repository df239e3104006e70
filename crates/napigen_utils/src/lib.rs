pub mod errors;
pub mod fs;
pub mod logger;
pub mod suggest;

pub use errors::{Diagnostic, emit_diagnostic, emit_diagnostics};
pub use fs::{normalize_line_endings, read_text, write_atomic};
pub use suggest::find_best_match;
