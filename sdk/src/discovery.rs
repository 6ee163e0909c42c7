use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Where each source family lives below the input root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    pub network_dir:    PathBuf,
    pub datacenter_dir: PathBuf,
    pub extension:      String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        SourceLayout {
            network_dir:    PathBuf::from("scripts/com/ankamagames/dofus/network"),
            datacenter_dir: PathBuf::from("scripts/com/ankamagames/dofus/datacenter"),
            extension:      "as".to_string(),
        }
    }
}

/// Source files sorted by role. Paths are sorted so that runs are repeatable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    pub messages: Vec<PathBuf>,
    pub types:    Vec<PathBuf>,
    pub enums:    Vec<PathBuf>,
    pub records:  Vec<PathBuf>,
}

impl SourceSet {
    pub fn network_count(&self) -> usize {
        self.messages.len() + self.types.len() + self.enums.len()
    }
}

pub fn discover(input_root: &Path, layout: &SourceLayout) -> SourceSet {
    let mut sources = SourceSet::default();

    let network_root = input_root.join(&layout.network_dir);
    for path in source_files(&network_root, &layout.extension) {
        let relative = path.strip_prefix(&network_root).unwrap_or(&path);
        let has = |name: &str| relative.components().any(|c| c.as_os_str() == name);
        if has("messages") {
            sources.messages.push(path);
        } else if has("types") {
            sources.types.push(path);
        } else if has("enums") {
            sources.enums.push(path);
        }
    }

    sources.records = source_files(&input_root.join(&layout.datacenter_dir), &layout.extension);
    sources
}

fn source_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!("Unable to find source folder '{}'", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}
