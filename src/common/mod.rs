mod registry;

pub use registry::{NamedRegistry, RegistryError};

pub trait Named {
    fn name(&self) -> &str;
}
