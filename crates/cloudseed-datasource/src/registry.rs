// ── Datasource registry ──
//
// A fixed-priority list of datasource strategies, probed in order. No
// global state: the orchestrator builds one registry per run from its
// configuration and drops it afterwards.

use tracing::debug;

use crate::datasource::Datasource;

/// An ordered set of datasources; earlier entries win.
#[derive(Default)]
pub struct DatasourceRegistry {
    sources: Vec<Box<dyn Datasource>>,
}

impl DatasourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a datasource at the lowest priority.
    pub fn register(&mut self, source: Box<dyn Datasource>) {
        self.sources.push(source);
    }

    /// All registered datasources, in priority order.
    pub fn sources(&self) -> &[Box<dyn Datasource>] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Probe each datasource in priority order and return the first one
    /// whose environment markers are present.
    pub async fn select(&self) -> Option<&dyn Datasource> {
        for source in &self.sources {
            if source.is_available().await {
                debug!(source = source.source_type(), "datasource selected");
                return Some(source.as_ref());
            }
            debug!(source = source.source_type(), "datasource not available");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::DatasourceError;
    use crate::metadata::Metadata;

    struct FixedDatasource {
        name: &'static str,
        available: bool,
    }

    #[async_trait]
    impl Datasource for FixedDatasource {
        fn source_type(&self) -> &'static str {
            self.name
        }

        fn config_root(&self) -> &str {
            ""
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        fn availability_changes(&self) -> bool {
            false
        }

        async fn fetch_metadata(&self) -> Result<Metadata, DatasourceError> {
            Ok(Metadata::default())
        }

        async fn fetch_userdata(&self) -> Result<Vec<u8>, DatasourceError> {
            Ok(Vec::new())
        }

        async fn fetch_network_config(&self) -> Result<Option<String>, DatasourceError> {
            Ok(None)
        }
    }

    fn registry(entries: &[(&'static str, bool)]) -> DatasourceRegistry {
        let mut registry = DatasourceRegistry::new();
        for &(name, available) in entries {
            registry.register(Box::new(FixedDatasource { name, available }));
        }
        registry
    }

    #[tokio::test]
    async fn first_available_wins() {
        let registry = registry(&[("first", false), ("second", true), ("third", true)]);
        let selected = registry.select().await;
        assert_eq!(selected.map(|s| s.source_type()), Some("second"));
    }

    #[tokio::test]
    async fn none_available_selects_nothing() {
        let registry = registry(&[("first", false), ("second", false)]);
        assert!(registry.select().await.is_none());
    }

    #[tokio::test]
    async fn empty_registry_selects_nothing() {
        assert!(DatasourceRegistry::new().select().await.is_none());
    }
}
