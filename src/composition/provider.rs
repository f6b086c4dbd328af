//! Service resolution with lifetimes.
//!
//! # Responsibilities
//! - Resolve the last registration for a service type
//! - Cache singletons on the provider and scoped instances on the scope
//! - Hand constructors a [`Resolver`] for their own dependencies
//!
//! # Design Decisions
//! - Singletons are built with a root-only resolver, so a singleton can never
//!   capture a scoped dependency
//! - Each cached type has its own slot; concurrent first resolutions of the
//!   same type wait on that slot, so a singleton (or a scoped instance) is
//!   constructed exactly once. Other types resolve in parallel

use dashmap::DashMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::composition::descriptor::{downcast, Instance, Lifetime, ServiceDescriptor};
use crate::composition::error::ResolveError;

/// At most one instance per type, filled by whichever caller gets there first.
type Slot = Arc<Mutex<Option<Instance>>>;

struct Root {
    registrations: HashMap<TypeId, Arc<ServiceDescriptor>>,
    singletons: DashMap<TypeId, Slot>,
}

/// The root container built from a [`ServiceCollection`](crate::composition::ServiceCollection).
#[derive(Clone)]
pub struct ServiceProvider {
    root: Arc<Root>,
}

impl ServiceProvider {
    pub(crate) fn new(descriptors: &[Arc<ServiceDescriptor>]) -> Self {
        let registrations = descriptors
            .iter()
            .map(|descriptor| (descriptor.service_type().id(), descriptor.clone()))
            .collect();
        Self {
            root: Arc::new(Root {
                registrations,
                singletons: DashMap::new(),
            }),
        }
    }

    pub fn get<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>, ResolveError> {
        self.resolver().get::<S>()
    }

    pub fn create_scope(&self) -> ServiceScope {
        ServiceScope {
            root: self.root.clone(),
            instances: DashMap::new(),
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver {
            root: &self.root,
            scope: None,
        }
    }
}

/// A unit of work (typically one request) owning its scoped instances.
pub struct ServiceScope {
    root: Arc<Root>,
    instances: DashMap<TypeId, Slot>,
}

impl ServiceScope {
    pub fn get<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>, ResolveError> {
        Resolver {
            root: &self.root,
            scope: Some(&self.instances),
        }
        .get::<S>()
    }
}

/// Dependency lookup handed to constructors.
pub struct Resolver<'a> {
    root: &'a Root,
    scope: Option<&'a DashMap<TypeId, Slot>>,
}

impl Resolver<'_> {
    pub fn get<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>, ResolveError> {
        let instance = self.resolve(TypeId::of::<S>(), std::any::type_name::<S>())?;
        downcast::<S>(&instance)
    }

    fn resolve(&self, id: TypeId, name: &'static str) -> Result<Instance, ResolveError> {
        let descriptor = self
            .root
            .registrations
            .get(&id)
            .ok_or(ResolveError::NotRegistered(name))?;

        match descriptor.lifetime() {
            Lifetime::Singleton => {
                let root_only = Resolver {
                    root: self.root,
                    scope: None,
                };
                cached(&self.root.singletons, id, || {
                    descriptor.implementation().activate(&root_only)
                })
            }
            Lifetime::Scoped => {
                let scope = self.scope.ok_or(ResolveError::ScopedFromRoot(name))?;
                cached(scope, id, || descriptor.implementation().activate(self))
            }
            Lifetime::Transient => descriptor.implementation().activate(self),
        }
    }
}

fn cached(
    cache: &DashMap<TypeId, Slot>,
    id: TypeId,
    activate: impl FnOnce() -> Result<Instance, ResolveError>,
) -> Result<Instance, ResolveError> {
    // Clone the slot out so the shard lock is released before activation.
    let slot = cache.entry(id).or_default().clone();
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = guard.as_ref() {
        return Ok(existing.clone());
    }
    let instance = activate()?;
    *guard = Some(instance.clone());
    Ok(instance)
}
