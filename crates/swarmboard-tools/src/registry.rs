//! Tool registry with capability and domain indexes

use crate::error::RegistryError;
use crate::tools::{Calculator, Sentiment, Stats};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use swarmboard_domain::{Tool, ToolError, ToolSpec};
use tracing::{debug, info};

/// Named collection of tools
///
/// Tools are stored as shared trait objects so the registry can be cloned
/// cheaply and handed to every specialist turn. Iteration order is by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    capability_index: BTreeMap<String, Vec<String>>,
    domain_index: BTreeMap<String, Vec<String>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `calculator`, `stats` and `sentiment`
    pub fn with_mock_tools() -> Self {
        let mut registry = Self::new();
        let tools: [Arc<dyn Tool>; 3] = [
            Arc::new(Calculator::new()),
            Arc::new(Stats::new()),
            Arc::new(Sentiment::new()),
        ];
        for tool in tools {
            // names are distinct, registration cannot collide
            let _ = registry.register(tool);
        }
        registry
    }

    /// Register a tool under its spec name
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if the name is taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let spec = tool.spec().clone();
        if self.tools.contains_key(&spec.name) {
            return Err(RegistryError::Duplicate(spec.name));
        }

        for capability in &spec.capabilities {
            self.capability_index
                .entry(capability.clone())
                .or_default()
                .push(spec.name.clone());
        }
        self.domain_index
            .entry(spec.domain.clone())
            .or_default()
            .push(spec.name.clone());

        info!(tool = %spec.name, capabilities = ?spec.capabilities, "Registered tool");
        self.tools.insert(spec.name, tool);
        Ok(())
    }

    /// Remove a tool and its index entries
    ///
    /// # Errors
    ///
    /// [`RegistryError::ToolNotFound`] if no tool has this name.
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        let tool = self
            .tools
            .remove(name)
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))?;
        let spec = tool.spec();

        for capability in &spec.capabilities {
            remove_from_index(&mut self.capability_index, capability, name);
        }
        remove_from_index(&mut self.domain_index, &spec.domain, name);

        info!(tool = name, "Unregistered tool");
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Specs of every registered tool, sorted by name
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec().clone()).collect()
    }

    /// Names of tools offering any of the given capabilities, sorted and unique
    pub fn tools_for_capabilities<S: AsRef<str>>(&self, capabilities: &[S]) -> Vec<String> {
        let mut names: Vec<String> = capabilities
            .iter()
            .filter_map(|c| self.capability_index.get(c.as_ref()))
            .flatten()
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Names of tools in a domain, in registration order
    pub fn tools_for_domain(&self, domain: &str) -> Vec<String> {
        self.domain_index.get(domain).cloned().unwrap_or_default()
    }

    /// Every capability offered by some tool
    pub fn capabilities(&self) -> Vec<String> {
        self.capability_index.keys().cloned().collect()
    }

    /// Every domain with at least one tool
    pub fn domains(&self) -> Vec<String> {
        self.domain_index.keys().cloned().collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Compact TOON catalog for planning prompts: name, domain, description
    pub fn catalog(&self) -> String {
        let rows: Vec<Value> = self
            .tools
            .values()
            .map(|t| {
                let spec = t.spec();
                json!({
                    "name": spec.name,
                    "domain": spec.domain,
                    "description": spec.description,
                })
            })
            .collect();
        swarmboard_toon::encode(&json!({ "tools": rows }))
    }

    /// TOON description of the named tools including their input schemas
    ///
    /// Unknown names are skipped.
    pub fn describe<'a, I>(&self, names: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<Value> = names
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| {
                let spec = t.spec();
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "input": spec.input_schema,
                })
            })
            .collect();
        swarmboard_toon::encode(&json!({ "tools": rows }))
    }

    /// Invoke a tool by name
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidInput`] for unknown tools, otherwise whatever the
    /// tool returns.
    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))?;
        debug!(tool = name, "Invoking tool");
        tool.invoke(input).await
    }
}

fn remove_from_index(index: &mut BTreeMap<String, Vec<String>>, key: &str, name: &str) {
    if let Some(names) = index.get_mut(key) {
        names.retain(|n| n != name);
        if names.is_empty() {
            index.remove(key);
        }
    }
}
