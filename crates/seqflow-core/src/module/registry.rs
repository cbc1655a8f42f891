use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use log::{debug, info};

use super::{Backend, Module, ModuleDescriptor, ModuleSource};
use crate::errors::ConfigurationError;
use crate::params::Version;

/// Registro de módulos construido explícitamente e inyectado en quien
/// construye el workflow.
///
/// Las búsquedas leen la caché concurrente; `reload` la reconstruye bajo el
/// candado de escritura, así que nunca se observa una caché a medio cargar.
#[derive(Default)]
pub struct ModuleRegistry {
    gate: RwLock<()>,
    sources: RwLock<Vec<Arc<dyn ModuleSource>>>,
    manual: RwLock<Vec<ModuleDescriptor>>,
    cache: DashMap<String, Vec<ModuleDescriptor>>,
}

impl ModuleRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&self, descriptor: ModuleDescriptor) {
        let _guard = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        self.manual.write().unwrap_or_else(PoisonError::into_inner).push(descriptor.clone());
        self.insert(descriptor);
    }

    /// Añade una fuente y carga sus descriptores.
    pub fn add_source(&self, source: Arc<dyn ModuleSource>) {
        let _guard = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        for descriptor in source.descriptors() {
            self.insert(descriptor);
        }
        self.sources.write().unwrap_or_else(PoisonError::into_inner).push(source);
    }

    /// Vacía la caché y vuelve a consultar todas las fuentes.
    pub fn reload(&self) {
        let _guard = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.cache.clear();
        for descriptor in self.manual.read().unwrap_or_else(PoisonError::into_inner).iter() {
            self.insert(descriptor.clone());
        }
        for source in self.sources.read().unwrap_or_else(PoisonError::into_inner).iter() {
            let descriptors = source.descriptors();
            debug!("module source {}: {} descriptors", source.name(), descriptors.len());
            for descriptor in descriptors {
                self.insert(descriptor);
            }
        }
        info!("module registry reloaded: {} modules", self.cache.len());
    }

    fn insert(&self, descriptor: ModuleDescriptor) {
        let mut versions = self.cache.entry(descriptor.name().to_string()).or_default();
        versions.retain(|d| d.version() != descriptor.version());
        versions.push(descriptor);
    }

    /// Descriptor de `name` para `backend`: la versión exacta si se pide,
    /// la más alta en otro caso.
    pub fn descriptor(&self, name: &str, version: Option<&Version>, backend: Backend) -> Result<ModuleDescriptor, ConfigurationError> {
        let _guard = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let unknown = || {
            let requested = version.map(|v| format!(" (version {v})")).unwrap_or_default();
            ConfigurationError::UnknownModule(format!("{name}{requested} for {backend:?} backend"))
        };
        let versions = self.cache.get(&name.to_lowercase()).ok_or_else(unknown)?;
        let mut candidates = versions.iter().filter(|d| d.supports(backend));
        let found = match version {
            Some(v) => candidates.find(|d| d.version() == v),
            None => candidates.max_by(|a, b| a.version().cmp(b.version())),
        };
        found.cloned().ok_or_else(unknown)
    }

    pub fn load(&self, name: &str, version: Option<&Version>, backend: Backend) -> Result<Box<dyn Module>, ConfigurationError> {
        Ok(self.descriptor(name, version, backend)?.instantiate())
    }

    pub fn names(&self) -> Vec<String> {
        let _guard = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = self.cache.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool { self.cache.contains_key(&name.to_lowercase()) }
}
