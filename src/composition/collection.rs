//! The ordered, mutable registration table.

use std::any::TypeId;
use std::sync::Arc;

use crate::composition::descriptor::{Implementation, Lifetime, ServiceDescriptor, ServiceType};
use crate::composition::provider::ServiceProvider;

/// Registrations in insertion order. Later registrations for the same
/// service type win at resolution time.
#[derive(Clone, Debug, Default)]
pub struct ServiceCollection {
    descriptors: Vec<Arc<ServiceDescriptor>>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(Arc::new(descriptor));
        self
    }

    /// Add only when nothing is registered for the service type yet.
    pub fn try_add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        if !self.contains(descriptor.service_type().id()) {
            self.add(descriptor);
        }
        self
    }

    pub fn add_singleton(&mut self, service_type: ServiceType, implementation: Implementation) -> &mut Self {
        self.add(ServiceDescriptor::new(service_type, implementation, Lifetime::Singleton))
    }

    pub fn add_scoped(&mut self, service_type: ServiceType, implementation: Implementation) -> &mut Self {
        self.add(ServiceDescriptor::new(service_type, implementation, Lifetime::Scoped))
    }

    pub fn add_transient(&mut self, service_type: ServiceType, implementation: Implementation) -> &mut Self {
        self.add(ServiceDescriptor::new(service_type, implementation, Lifetime::Transient))
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.descriptors.iter().any(|d| d.service_type().id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<ServiceDescriptor>> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ServiceDescriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn replace(&mut self, index: usize, descriptor: ServiceDescriptor) {
        self.descriptors[index] = Arc::new(descriptor);
    }

    /// Freeze the table into a provider. Later edits do not affect it.
    pub fn build(&self) -> ServiceProvider {
        ServiceProvider::new(&self.descriptors)
    }
}
