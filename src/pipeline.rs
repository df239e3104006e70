//! One generation run: scan, emit both targets, persist the snapshot.
//!
//! Nothing is written until the model is complete and the flat API has been
//! rendered, so a scan failure or a missing flat-API marker leaves the output
//! directories untouched. The wrapper header comes last; its failure is
//! reported through [`GenerationStatus::WrapperFailed`] after the flat API and
//! snapshot are already on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use napigen_cache::{SnapshotChange, SnapshotStore};
use napigen_model::ApiModel;
use napigen_utils::write_atomic;
use tracing::{debug, error, info, warn};

use crate::config::ProjectConfig;
use crate::emit::{FlatApiEmitter, Template, WrapperHeaderEmitter};
use crate::scanner::scan_model;

/// Outcome of a run that did not hit a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    Success,
    /// No annotated class was found.
    NoModel,
    /// The flat API and snapshot were written but the wrapper header was not.
    WrapperFailed,
}

impl GenerationStatus {
    /// Process exit code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::NoModel => 110,
            Self::WrapperFailed => 111,
        }
    }
}

#[derive(Debug)]
pub struct GenerationReport {
    pub status: GenerationStatus,
    pub model: Option<ApiModel>,
    pub flat_api: Option<PathBuf>,
    pub snapshot: Option<SnapshotChange>,
    pub shared_header: Option<PathBuf>,
    pub wrapper_header: Option<PathBuf>,
}

impl GenerationReport {
    fn no_model() -> Self {
        Self {
            status: GenerationStatus::NoModel,
            model: None,
            flat_api: None,
            snapshot: None,
            shared_header: None,
            wrapper_header: None,
        }
    }
}

/// Runs a full generation for `config`. Hard errors (malformed declarations,
/// a missing flat-API marker, I/O on the flat API or snapshot) come back as
/// `Err`; the soft outcomes are carried by the report's status.
pub fn generate(config: &ProjectConfig) -> Result<GenerationReport> {
    info!(headers = config.headers.len(), "generating native api");

    let Some(model) = scan_model(&config.headers)? else {
        warn!("no annotated classes found, nothing to generate");
        return Ok(GenerationReport::no_model());
    };

    let template = Template::load(&config.flat_api_template)?;
    let flat_api = FlatApiEmitter::new(config.markers.flat_api(), config.markers.policy)
        .emit(&model, &template)
        .with_context(|| {
            format!(
                "failed to emit flat api from {}",
                config.flat_api_template.display()
            )
        })?;

    let flat_api_path = config.flat_api_output()?;
    write_atomic(&flat_api_path, &flat_api)?;
    debug!(path = %flat_api_path.display(), "flat api written");

    let store = SnapshotStore::new(&config.out_dir);
    let snapshot = store.store(&model)?;
    match &snapshot {
        SnapshotChange::Created => info!(hash = model.content_hash(), "api snapshot created"),
        SnapshotChange::Unchanged => info!(hash = model.content_hash(), "api unchanged"),
        SnapshotChange::Changed { previous } => info!(
            hash = model.content_hash(),
            previous = %previous,
            "api changed"
        ),
    }

    let shared_header = copy_shared_header(config)?;

    let (status, wrapper_header) = match write_wrapper_header(config, &model) {
        Ok(path) => (GenerationStatus::Success, Some(path)),
        Err(err) => {
            error!("wrapper header generation failed: {err:#}");
            (GenerationStatus::WrapperFailed, None)
        }
    };

    Ok(GenerationReport {
        status,
        model: Some(model),
        flat_api: Some(flat_api_path),
        snapshot: Some(snapshot),
        shared_header,
        wrapper_header,
    })
}

fn copy_shared_header(config: &ProjectConfig) -> Result<Option<PathBuf>> {
    let Some(source) = &config.shared_header else {
        return Ok(None);
    };
    let Some(name) = source.file_name() else {
        bail!("shared header {} has no file name", source.display());
    };

    let out_dir = config.wrapper_out_dir();
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let target = out_dir.join(name);
    fs::copy(source, &target).with_context(|| {
        format!(
            "failed to copy shared header {} to {}",
            source.display(),
            target.display()
        )
    })?;
    debug!(path = %target.display(), "shared header copied");
    Ok(Some(target))
}

fn write_wrapper_header(config: &ProjectConfig, model: &ApiModel) -> Result<PathBuf> {
    let template = Template::load(&config.wrapper_template)?;
    let header = WrapperHeaderEmitter::new(
        config.markers.wrapper(),
        config.include_pattern.as_str(),
        config.markers.policy,
    )
    .emit(model, &template, &config.include_classes)
    .with_context(|| {
        format!(
            "failed to emit wrapper header from {}",
            config.wrapper_template.display()
        )
    })?;

    let path = config.wrapper_output()?;
    write_atomic(&path, &header)?;
    debug!(path = %path.display(), "wrapper header written");
    Ok(path)
}
