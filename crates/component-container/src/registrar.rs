use crate::container::Container;

/// A unit of start-up wiring that installs bindings into a container.
///
/// Implementations must be idempotent: registering twice leaves the container
/// in the same state as registering once.
pub trait ComponentRegistrar {
    fn register(&self, container: &mut Container);
}
