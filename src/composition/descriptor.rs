//! Service registrations.
//!
//! A container instance is stored type-erased as `Arc<dyn Any>` wrapping an
//! `Arc<S>`, where `S` is the registered service type (often a trait object).

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::composition::error::ResolveError;
use crate::composition::provider::Resolver;
use crate::interception::{Interceptable, LoggingInterceptor};
use crate::logging::TargetType;

pub type Instance = Arc<dyn Any + Send + Sync>;
pub type Activator = Arc<dyn Fn(&Resolver<'_>) -> Result<Instance, ResolveError> + Send + Sync>;
pub type Decorator =
    Arc<dyn Fn(Instance, LoggingInterceptor, TargetType) -> Result<Instance, ResolveError> + Send + Sync>;

/// How long a resolved instance is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifetime {
    /// One instance per provider.
    Singleton,
    /// One instance per scope.
    Scoped,
    /// A new instance per resolution.
    Transient,
}

/// What a registration is keyed on.
#[derive(Clone)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
    kind: ServiceKind,
}

#[derive(Clone)]
enum ServiceKind {
    Concrete,
    Interface { capability: Option<Decorator> },
}

impl ServiceType {
    /// A concrete (non-interface) service type.
    pub fn concrete<S: Send + Sync + 'static>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
            kind: ServiceKind::Concrete,
        }
    }

    /// An interface (trait object) without the capability marker.
    pub fn interface<I: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            name: std::any::type_name::<I>(),
            kind: ServiceKind::Interface { capability: None },
        }
    }

    /// An interface carrying the [`Interceptable`] marker.
    pub fn interceptable<I: ?Sized + Interceptable>() -> Self {
        let decorate: Decorator = Arc::new(
            |instance: Instance, interceptor: LoggingInterceptor, implementation: TargetType| {
                let target = downcast::<I>(&instance)?;
                let decorated: Instance = Arc::new(I::decorate(target, interceptor, implementation));
                Ok(decorated)
            },
        );
        Self {
            id: TypeId::of::<I>(),
            name: std::any::type_name::<I>(),
            kind: ServiceKind::Interface {
                capability: Some(decorate),
            },
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ServiceKind::Interface { .. })
    }

    pub fn is_interceptable(&self) -> bool {
        matches!(self.kind, ServiceKind::Interface { capability: Some(_) })
    }

    pub(crate) fn capability(&self) -> Option<&Decorator> {
        match &self.kind {
            ServiceKind::Interface { capability } => capability.as_ref(),
            ServiceKind::Concrete => None,
        }
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceType")
            .field("name", &self.name)
            .field("interface", &self.is_interface())
            .field("interceptable", &self.is_interceptable())
            .finish()
    }
}

/// How the container produces an instance.
#[derive(Clone)]
pub enum Implementation {
    /// A concrete implementation type and its constructor.
    Type { ty: TargetType, activate: Activator },
    /// An opaque factory; there is no known implementation type.
    Factory(Activator),
    /// A pre-built instance.
    Instance(Instance),
}

impl Implementation {
    /// Implementation type `T` registered for service `S`.
    ///
    /// `activate` receives a resolver for constructor dependencies.
    pub fn of<S, T, F>(activate: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<S>, ResolveError> + Send + Sync + 'static,
    {
        Implementation::Type {
            ty: TargetType::of::<T>(),
            activate: erase(activate),
        }
    }

    pub fn factory<S, F>(factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<S>, ResolveError> + Send + Sync + 'static,
    {
        Implementation::Factory(erase(factory))
    }

    pub fn instance<S: ?Sized + Send + Sync + 'static>(value: Arc<S>) -> Self {
        Implementation::Instance(Arc::new(value))
    }

    /// The concrete implementation type, when one is known.
    pub fn implementation_type(&self) -> Option<TargetType> {
        match self {
            Implementation::Type { ty, .. } => Some(*ty),
            _ => None,
        }
    }

    pub(crate) fn activate(&self, resolver: &Resolver<'_>) -> Result<Instance, ResolveError> {
        match self {
            Implementation::Type { activate, .. } | Implementation::Factory(activate) => activate(resolver),
            Implementation::Instance(instance) => Ok(instance.clone()),
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Implementation::Type { ty, .. } => f.debug_tuple("Type").field(ty).finish(),
            Implementation::Factory(_) => f.write_str("Factory"),
            Implementation::Instance(_) => f.write_str("Instance"),
        }
    }
}

fn erase<S, F>(activate: F) -> Activator
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(&Resolver<'_>) -> Result<Arc<S>, ResolveError> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &Resolver<'_>| {
        let service = activate(resolver)?;
        let instance: Instance = Arc::new(service);
        Ok(instance)
    })
}

pub(crate) fn downcast<S: ?Sized + 'static>(instance: &Instance) -> Result<Arc<S>, ResolveError> {
    instance
        .downcast_ref::<Arc<S>>()
        .cloned()
        .ok_or(ResolveError::TypeMismatch(std::any::type_name::<S>()))
}

/// One entry of the registration table.
#[derive(Clone, Debug)]
pub struct ServiceDescriptor {
    service_type: ServiceType,
    implementation: Implementation,
    lifetime: Lifetime,
}

impl ServiceDescriptor {
    pub fn new(service_type: ServiceType, implementation: Implementation, lifetime: Lifetime) -> Self {
        Self {
            service_type,
            implementation,
            lifetime,
        }
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn implementation_type(&self) -> Option<TargetType> {
        self.implementation.implementation_type()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}
