//! Construction and upcasting seams between implementations and contracts.

use std::any::Any;
use std::sync::Arc;

use crate::container::Container;
use crate::error::ContainerError;

/// A concrete type the container knows how to build.
///
/// `construct` may resolve its own dependencies from the container.
pub trait Injectable: Any + Send + Sync + Sized {
    fn construct(container: &Container) -> Result<Self, ContainerError>;
}

/// Upcasts a shared implementation to the contract `C`.
///
/// Every type provides itself. Implement `Provides<dyn Trait>` for each trait
/// object contract the type satisfies; the body is just `self`.
pub trait Provides<C: ?Sized + 'static>: Send + Sync + 'static {
    fn provide(self: Arc<Self>) -> Arc<C>;
}

impl<T: Send + Sync + 'static> Provides<T> for T {
    fn provide(self: Arc<Self>) -> Arc<T> {
        self
    }
}
