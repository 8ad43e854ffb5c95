use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{FrameworkError, FrameworkResult};
use crate::plugins::nodeutilization::{
    BalancedNodeUtilization, HighNodeUtilization, LowNodeUtilization,
};

use super::{Handle, ScorePlugin};

/// Builds a plugin from its optional args and the framework handle.
pub type PluginFactory =
    fn(Option<&serde_json::Value>, Handle) -> FrameworkResult<Arc<dyn ScorePlugin>>;

/// Maps plugin names to their factories.
#[derive(Clone, Default)]
pub struct Registry {
    factories: BTreeMap<String, PluginFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every plugin shipped in this crate.
    pub fn new_in_tree() -> Self {
        let mut registry = Self::new();
        for (name, factory) in [
            (BalancedNodeUtilization::NAME, BalancedNodeUtilization::factory as PluginFactory),
            (HighNodeUtilization::NAME, HighNodeUtilization::factory as PluginFactory),
            (LowNodeUtilization::NAME, LowNodeUtilization::factory as PluginFactory),
        ] {
            registry.factories.insert(name.to_string(), factory);
        }
        registry
    }

    pub fn register(&mut self, name: &str, factory: PluginFactory) -> FrameworkResult<()> {
        if self.factories.contains_key(name) {
            return Err(FrameworkError::DuplicatePlugin(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Instantiates the plugin registered under `name`.
    pub fn build(
        &self,
        name: &str,
        args: Option<&serde_json::Value>,
        handle: Handle,
    ) -> FrameworkResult<Arc<dyn ScorePlugin>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| FrameworkError::UnknownPlugin(name.to_string()))?;
        factory(args, handle)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
