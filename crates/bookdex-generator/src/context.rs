//! Render context shared between the host build and its hooks.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use bookdex_core::Resource;

/// What a hook may read from, and register with, the running build.
pub trait RenderContext: Send + Sync {
    /// Register a resource under a category such as `js` or `css`.
    fn add_resource(&mut self, resource: Resource, category: &str);

    /// Root of the rendered output.
    fn output_path(&self) -> &Path;
}

/// The context used by [`Builder`](crate::Builder).
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    output_path: PathBuf,
    resources: BTreeMap<String, Vec<Resource>>,
}

impl BuildContext {
    /// Create a context rendering into `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            resources: BTreeMap::new(),
        }
    }

    /// Resources registered under `category`, in registration order.
    pub fn resources(&self, category: &str) -> &[Resource] {
        self.resources
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl RenderContext for BuildContext {
    fn add_resource(&mut self, resource: Resource, category: &str) {
        let entries = self.resources.entry(category.to_string()).or_default();
        if !entries.contains(&resource) {
            entries.push(resource);
        }
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }
}
