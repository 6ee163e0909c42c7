//! scriptgen
//!
//! Runs the generators over a folder of decompiled client scripts:
//!
//! - `generate_network` builds messages, types and enums,
//! - `generate_records` builds the data-center record classes.
//!
//! Both wipe the output folder first and return a [`RunSummary`].

pub mod builder;
pub mod discovery;
pub mod output;

pub use discovery::{discover, SourceLayout, SourceSet};
pub use output::OutputTree;
pub use scriptgen_compiler::{GenError, GeneratorConfig};

use builder::{build_enum_family, build_protocol_family, build_record_family, FamilyReport};
use log::{info, warn};
use scriptgen_compiler::{Family, IdRegistry};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Everything one run needs. Deserializable so that a JSON file can override
/// any part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input:     PathBuf,
    pub output:    PathBuf,
    pub layout:    SourceLayout,
    pub generator: GeneratorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input:     PathBuf::from("./Input"),
            output:    PathBuf::from("./Output"),
            layout:    SourceLayout::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Settings, GenError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub families: Vec<FamilyReport>,
}

impl RunSummary {
    pub fn generated(&self) -> usize {
        self.families.iter().map(|f| f.generated).sum()
    }

    pub fn skipped(&self) -> usize {
        self.families.iter().map(|f| f.skipped).sum()
    }

    pub fn family(&self, name: &str) -> Option<&FamilyReport> {
        self.families.iter().find(|f| f.family == name)
    }

    fn log_timings(&self) {
        for family in &self.families {
            info!("> {} generated in {}ms", family.family, family.elapsed.as_millis());
        }
    }
}

/// `None` when there is nothing to read yet: a missing input folder is
/// created empty and the run stops there, leaving the output untouched.
fn prepare(settings: &Settings) -> Result<Option<OutputTree>, GenError> {
    if settings.input.starts_with(&settings.output) {
        return Err(GenError::OutputOverlapsInput(settings.output.display().to_string()));
    }
    if !settings.input.is_dir() {
        warn!("Input folder '{}' is missing, creating it", settings.input.display());
        fs::create_dir_all(&settings.input)?;
        return Ok(None);
    }
    OutputTree::prepare(&settings.output).map(Some)
}

/// Messages, then types, then enums, all against one id registry.
pub fn generate_network(settings: &Settings) -> Result<RunSummary, GenError> {
    let mut summary = RunSummary::default();
    let mut output = match prepare(settings)? {
        Some(output) => output,
        None => return Ok(summary),
    };
    let sources = discover(&settings.input, &settings.layout);

    if sources.network_count() == 0 {
        warn!(
            "Unable to find any .{} files in path '{}'",
            settings.layout.extension,
            settings.input.display()
        );
        return Ok(summary);
    }

    let config = &settings.generator;
    let ids = IdRegistry::load(&settings.input.join(&settings.layout.network_dir), config)?;

    summary
        .families
        .push(build_protocol_family(Family::Message, &sources.messages, config, &ids, &mut output)?);
    summary
        .families
        .push(build_protocol_family(Family::Type, &sources.types, config, &ids, &mut output)?);
    summary.families.push(build_enum_family(&sources.enums, config, &mut output)?);

    summary.log_timings();
    Ok(summary)
}

pub fn generate_records(settings: &Settings) -> Result<RunSummary, GenError> {
    info!("Updating datacenter...");
    let mut summary = RunSummary::default();
    let mut output = match prepare(settings)? {
        Some(output) => output,
        None => return Ok(summary),
    };
    let sources = discover(&settings.input, &settings.layout);

    if sources.records.is_empty() {
        warn!(
            "Unable to find any .{} files in path '{}'",
            settings.layout.extension,
            settings.input.join(&settings.layout.datacenter_dir).display()
        );
        return Ok(summary);
    }

    summary
        .families
        .push(build_record_family(&sources.records, &settings.generator, &mut output)?);

    summary.log_timings();
    Ok(summary)
}
