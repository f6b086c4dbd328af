//! Registration rewriting: swap capability-marked registrations for
//! decorator-producing factories.
//!
//! # Responsibilities
//! - Scan the table once at composition time
//! - Wrap eligible registrations, preserving their lifetime
//! - Leave every other registration untouched (same `Arc`)
//!
//! # Design Decisions
//! - Eligibility is decided from the registration alone: an interface
//!   service type carrying the marker, with a concrete implementation type
//! - The rewritten entry is a factory, so a second pass leaves it alone

use std::sync::Arc;

use crate::composition::collection::ServiceCollection;
use crate::composition::descriptor::{Activator, Implementation, Lifetime, ServiceDescriptor, ServiceType};
use crate::composition::provider::Resolver;
use crate::interception::LoggingInterceptor;

/// Whether a registration gets wrapped by [`rewrite_registrations`].
pub fn is_interceptable(descriptor: &ServiceDescriptor) -> bool {
    descriptor.service_type().is_interface()
        && descriptor.service_type().is_interceptable()
        && descriptor.implementation_type().is_some()
}

/// Rewrite every eligible registration in place. Returns how many changed.
pub fn rewrite_registrations(services: &mut ServiceCollection) -> usize {
    let mut rewritten = 0;
    for index in 0..services.len() {
        let Some(descriptor) = services.get(index).cloned() else {
            continue;
        };
        if let Some(decorated) = decorated_registration(&descriptor) {
            tracing::debug!(
                service = descriptor.service_type().name(),
                lifetime = ?descriptor.lifetime(),
                "Registering logging decorator"
            );
            services.replace(index, decorated);
            rewritten += 1;
        }
    }
    rewritten
}

fn decorated_registration(descriptor: &ServiceDescriptor) -> Option<ServiceDescriptor> {
    if !is_interceptable(descriptor) {
        return None;
    }
    let decorate = descriptor.service_type().capability()?.clone();
    let implementation_type = descriptor.implementation_type()?;
    let original = descriptor.implementation().clone();

    let factory: Activator = Arc::new(move |resolver: &Resolver<'_>| {
        let interceptor = resolver.get::<LoggingInterceptor>()?;
        let target = original.activate(resolver)?;
        decorate(target, (*interceptor).clone(), implementation_type)
    });

    Some(ServiceDescriptor::new(
        descriptor.service_type().clone(),
        Implementation::Factory(factory),
        descriptor.lifetime(),
    ))
}

impl ServiceCollection {
    /// Register `interceptor` (unless one already is) and wrap every
    /// capability-marked registration with its decorator.
    pub fn add_logging_interceptor(&mut self, interceptor: LoggingInterceptor) -> &mut Self {
        self.try_add(ServiceDescriptor::new(
            ServiceType::concrete::<LoggingInterceptor>(),
            Implementation::instance(Arc::new(interceptor)),
            Lifetime::Singleton,
        ));
        let rewritten = rewrite_registrations(self);
        tracing::info!(rewritten, "Logging interceptor registered");
        self
    }
}
