//! Generator for a flat, dynamically loadable native API and the C++ header
//! that binds to it lazily, both derived from `NAPI_*` annotations in C++
//! declarations.

pub mod cli;
pub mod config;
pub mod emit;
pub mod pipeline;
pub mod scanner;
pub mod version;

pub use napigen_cache as cache;
pub use napigen_model as model;
