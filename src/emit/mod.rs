//! Text targets produced from an [`ApiModel`](napigen_model::ApiModel).
//!
//! Both targets are templates with marker lines; the emitters build the
//! generated block for each marker and splice it in place of that line.

pub mod flat_api;
pub mod template;
pub mod wrapper;

pub use flat_api::{FlatApiEmitter, FlatApiMarkers};
pub use template::{MarkerPolicy, Template, TemplateError};
pub use wrapper::{DEFAULT_INCLUDE_PATTERN, WrapperHeaderEmitter, WrapperMarkers, default_return_value};
