use std::sync::Arc;

use crate::metadata::Metadata;

/// Source of ambient metadata, queried once per log call.
///
/// The handler only keeps a shared reference; whoever builds the provider
/// decides how long it lives. Closures returning [`Metadata`] implement
/// this trait directly.
pub trait MetadataProvider: Send + Sync {
    fn get(&self) -> Metadata;
}

impl<F> MetadataProvider for F
where
    F: Fn() -> Metadata + Send + Sync,
{
    fn get(&self) -> Metadata {
        self()
    }
}

/// Combines several providers into one.
///
/// Providers are queried in order; on key collision the later provider
/// wins.
#[derive(Clone, Default)]
pub struct MultiplexProvider {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl MultiplexProvider {
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        Self { providers }
    }

    pub fn push(&mut self, provider: Arc<dyn MetadataProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl MetadataProvider for MultiplexProvider {
    fn get(&self) -> Metadata {
        let mut metadata = Metadata::new();
        for provider in &self.providers {
            metadata.extend(provider.get());
        }
        metadata
    }
}
