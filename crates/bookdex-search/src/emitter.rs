//! Writing the index and its runtime scripts into the site output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{Result, SearchError, index::SearchIndex};

/// File name of the generated index script inside the output `js` directory.
pub const INDEX_SCRIPT_NAME: &str = "search-index.js";

/// Global the index script assigns and `search-engine.js` reads.
pub const INDEX_GLOBAL: &str = "searchIndex";

/// Search runtime compiled into the crate, as `(file name, contents)`.
///
/// Written when no runtime directory is configured.
pub const BUNDLED_RUNTIME: [(&str, &str); 2] = [
    ("search-engine.js", include_str!("../assets/search-engine.js")),
    ("search-glue.js", include_str!("../assets/search-glue.js")),
];

/// What an emission wrote.
#[derive(Debug, Clone, Default)]
pub struct EmitReport {
    /// Runtime files copied.
    pub assets_copied: usize,

    /// Size of the generated index script in bytes.
    pub index_bytes: usize,

    /// Path of the generated index script.
    pub index_path: PathBuf,
}

/// Writes runtime assets and the serialized index.
#[derive(Debug, Default)]
pub struct IndexEmitter;

impl IndexEmitter {
    /// Create a new emitter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Install the runtime and write the index script.
    pub fn emit(
        &self,
        index: &SearchIndex,
        assets_source_dir: Option<&Path>,
        output_js_dir: &Path,
    ) -> Result<EmitReport> {
        let assets_copied = self.install_runtime(assets_source_dir, output_js_dir)?;
        let mut report = self.write_index(index, output_js_dir)?;
        report.assets_copied = assets_copied;
        Ok(report)
    }

    /// Copy the runtime from `assets_source_dir`, or write the bundled one
    /// when no directory is given.
    pub fn install_runtime(
        &self,
        assets_source_dir: Option<&Path>,
        output_js_dir: &Path,
    ) -> Result<usize> {
        match assets_source_dir {
            Some(dir) => self.copy_assets(dir, output_js_dir),
            None => self.write_bundled_runtime(output_js_dir),
        }
    }

    /// Write [`BUNDLED_RUNTIME`] into `output_js_dir`, overwriting.
    pub fn write_bundled_runtime(&self, output_js_dir: &Path) -> Result<usize> {
        info!(dest = %output_js_dir.display(), "writing bundled search runtime");

        ensure_dir(output_js_dir)?;

        for (name, contents) in BUNDLED_RUNTIME {
            let dest = output_js_dir.join(name);
            fs::write(&dest, contents).map_err(|e| SearchError::io(&dest, e))?;
            debug!(dest = %dest.display(), bytes = contents.len(), "wrote bundled asset");
        }

        Ok(BUNDLED_RUNTIME.len())
    }

    /// Copy every regular file directly under `source_dir` into `output_js_dir`.
    ///
    /// Subdirectories are not descended into. Existing files are overwritten.
    pub fn copy_assets(&self, source_dir: &Path, output_js_dir: &Path) -> Result<usize> {
        info!(
            source = %source_dir.display(),
            dest = %output_js_dir.display(),
            "copying search runtime"
        );

        ensure_dir(output_js_dir)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(source_dir).map_err(|e| SearchError::io(source_dir, e))? {
            let path = entry.map_err(|e| SearchError::io(source_dir, e))?.path();
            if path.is_file() {
                files.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-file asset entry");
            }
        }
        files.sort();

        for file in &files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let dest = output_js_dir.join(name);
            fs::copy(file, &dest).map_err(|e| SearchError::io(file, e))?;
            debug!(src = %file.display(), dest = %dest.display(), "copied asset");
        }

        Ok(files.len())
    }

    /// Write `search-index.js` into `output_js_dir`.
    pub fn write_index(&self, index: &SearchIndex, output_js_dir: &Path) -> Result<EmitReport> {
        ensure_dir(output_js_dir)?;

        let script = render_index_script(index)?;
        let index_path = output_js_dir.join(INDEX_SCRIPT_NAME);
        fs::write(&index_path, &script).map_err(|e| SearchError::io(&index_path, e))?;

        info!(
            path = %index_path.display(),
            bytes = script.len(),
            documents = index.document_count,
            "wrote search index"
        );

        Ok(EmitReport {
            assets_copied: 0,
            index_bytes: script.len(),
            index_path,
        })
    }
}

/// Render the index as a script assigning it to [`INDEX_GLOBAL`].
pub fn render_index_script(index: &SearchIndex) -> Result<String> {
    let json = index.to_json()?;
    Ok(format!("var {INDEX_GLOBAL} = {json};\n"))
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| SearchError::io(path, e))
}
