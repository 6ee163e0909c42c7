use log::debug;
use scriptgen_compiler::{GenError, GeneratedFile};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The output root of one run. Preparing it wipes whatever an earlier run
/// left there.
#[derive(Debug)]
pub struct OutputTree {
    root:    PathBuf,
    written: usize,
}

impl OutputTree {
    pub fn prepare(root: &Path) -> Result<OutputTree, GenError> {
        if root.exists() {
            fs::remove_dir_all(root)?;
        }
        fs::create_dir_all(root)?;
        Ok(OutputTree {
            root:    root.to_path_buf(),
            written: 0,
        })
    }

    /// Writes the complete text of `file`, creating its parent folders.
    pub fn write(&mut self, file: &GeneratedFile) -> Result<PathBuf, GenError> {
        let path = self.root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.contents)?;
        debug!("Wrote {}", path.display());
        self.written += 1;
        Ok(path)
    }

    pub fn written(&self) -> usize {
        self.written
    }
}
