use std::fmt;
use std::sync::Arc;

use super::{Backend, Module};
use crate::params::Version;

pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn Module> + Send + Sync>;

/// Registro de un módulo: identidad, capacidades y constructor.
#[derive(Clone)]
pub struct ModuleDescriptor {
    name: String,
    version: Version,
    description: String,
    supports_local_backend: bool,
    supports_distributed_backend: bool,
    reusable_across_tasks: bool,
    factory: ModuleFactory,
}

impl ModuleDescriptor {
    /// Descriptor local-only, no reutilizable. El nombre se guarda en
    /// minúsculas.
    pub fn new<F>(name: &str, version: Version, factory: F) -> Self
        where F: Fn() -> Box<dyn Module> + Send + Sync + 'static
    {
        Self { name: name.to_lowercase(),
               version,
               description: String::new(),
               supports_local_backend: true,
               supports_distributed_backend: false,
               reusable_across_tasks: false,
               factory: Arc::new(factory) }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_local_backend(mut self, supported: bool) -> Self {
        self.supports_local_backend = supported;
        self
    }

    pub fn with_distributed_backend(mut self, supported: bool) -> Self {
        self.supports_distributed_backend = supported;
        self
    }

    pub fn with_reusable_across_tasks(mut self, reusable: bool) -> Self {
        self.reusable_across_tasks = reusable;
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn version(&self) -> &Version { &self.version }

    pub fn description(&self) -> &str { &self.description }

    pub fn supports_local_backend(&self) -> bool { self.supports_local_backend }

    pub fn supports_distributed_backend(&self) -> bool { self.supports_distributed_backend }

    pub fn reusable_across_tasks(&self) -> bool { self.reusable_across_tasks }

    pub fn supports(&self, backend: Backend) -> bool {
        match backend {
            Backend::Local => self.supports_local_backend,
            Backend::Distributed => self.supports_distributed_backend,
        }
    }

    pub fn instantiate(&self) -> Box<dyn Module> { (self.factory)() }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
         .field("name", &self.name)
         .field("version", &self.version)
         .field("local", &self.supports_local_backend)
         .field("distributed", &self.supports_distributed_backend)
         .field("reusable", &self.reusable_across_tasks)
         .finish()
    }
}

/// Origen de descriptores que el registro consulta en cada `reload`
/// (un paquete de módulos, un directorio de plugins...).
pub trait ModuleSource: Send + Sync {
    fn name(&self) -> &str;

    fn descriptors(&self) -> Vec<ModuleDescriptor>;
}
