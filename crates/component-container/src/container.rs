//! The binding table and its resolution rules.
//!
//! Binding mutates the table and therefore needs `&mut Container`; all wiring
//! happens before the container is shared. Resolution only needs `&Container`
//! and may run from any thread. Implementations are constructed at most once
//! and then shared, so every contract bound to the same implementation resolves
//! to the same instance.

use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::ContainerError;
use crate::provide::{Injectable, Provides};
use crate::registrar::ComponentRegistrar;

type Resolver = Arc<dyn Fn(&Container) -> Result<Box<dyn Any>, ContainerError> + Send + Sync>;
type SharedInstance = Arc<dyn Any + Send + Sync>;
type Pending = Mutex<HashSet<(TypeId, ThreadId)>>;

struct Binding {
    contract: &'static str,
    implementation: &'static str,
    resolve: Resolver,
}

#[derive(Default)]
pub struct Container {
    bindings: HashMap<TypeId, Binding>,
    instances: Mutex<HashMap<TypeId, SharedInstance>>,
    /// Implementations under construction, per constructing thread.
    pending: Pending,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds contract `C` to implementation `I`.
    ///
    /// An existing binding for `C` is replaced, so binding the same pair twice
    /// is a no-op in effect.
    pub fn bind<C, I>(&mut self) -> &mut Self
    where
        C: ?Sized + 'static,
        I: Injectable + Provides<C>,
    {
        let resolve: Resolver = Arc::new(|container: &Container| {
            let instance = container.shared::<I>()?;
            Ok(Box::new(<I as Provides<C>>::provide(instance)) as Box<dyn Any>)
        });
        self.insert::<C>(type_name::<I>(), resolve)
    }

    /// Binds `T` to an already built value.
    pub fn bind_instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        let shared = Arc::new(value);
        let resolve: Resolver = Arc::new(move |_: &Container| {
            Ok(Box::new(Arc::clone(&shared)) as Box<dyn Any>)
        });
        self.insert::<T>(type_name::<T>(), resolve)
    }

    /// Applies a registrar to this container.
    pub fn install<R: ComponentRegistrar + ?Sized>(&mut self, registrar: &R) -> &mut Self {
        registrar.register(self);
        self
    }

    /// Resolves contract `C`.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::NotBound`] if nothing is bound to `C`
    /// - any error raised while constructing the implementation
    pub fn get<C: ?Sized + 'static>(&self) -> Result<Arc<C>, ContainerError> {
        let binding = self
            .bindings
            .get(&TypeId::of::<C>())
            .ok_or(ContainerError::NotBound {
                contract: type_name::<C>(),
            })?;
        let resolved = (binding.resolve)(self)?;
        resolved
            .downcast::<Arc<C>>()
            .map(|boxed| *boxed)
            .map_err(|_| ContainerError::TypeMismatch {
                contract: binding.contract,
                implementation: binding.implementation,
            })
    }

    pub fn has<C: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<C>())
    }

    /// Type name of the implementation bound to `C`.
    pub fn implementation_of<C: ?Sized + 'static>(&self) -> Option<&'static str> {
        self.bindings
            .get(&TypeId::of::<C>())
            .map(|binding| binding.implementation)
    }

    /// Number of bound contracts.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert<C: ?Sized + 'static>(
        &mut self,
        implementation: &'static str,
        resolve: Resolver,
    ) -> &mut Self {
        let contract = type_name::<C>();
        tracing::debug!(contract, implementation, "binding contract");
        self.bindings.insert(
            TypeId::of::<C>(),
            Binding {
                contract,
                implementation,
                resolve,
            },
        );
        self
    }

    fn shared<I: Injectable>(&self) -> Result<Arc<I>, ContainerError> {
        let key = TypeId::of::<I>();
        if let Some(existing) = lock(&self.instances).get(&key).cloned() {
            return downcast_shared(existing);
        }

        // Built outside the lock: constructors resolve their own dependencies.
        let _pending = PendingGuard::enter(&self.pending, key, type_name::<I>())?;
        tracing::trace!(implementation = type_name::<I>(), "constructing instance");
        let created: SharedInstance = Arc::new(I::construct(self)?);
        let stored = lock(&self.instances).entry(key).or_insert(created).clone();
        downcast_shared(stored)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks an implementation as under construction on the current thread until
/// dropped.
struct PendingGuard<'a> {
    pending: &'a Pending,
    entry: (TypeId, ThreadId),
}

impl<'a> PendingGuard<'a> {
    fn enter(
        pending: &'a Pending,
        key: TypeId,
        implementation: &'static str,
    ) -> Result<Self, ContainerError> {
        let entry = (key, thread::current().id());
        if !lock(pending).insert(entry) {
            tracing::debug!(implementation, "dependency cycle detected");
            return Err(ContainerError::Cycle { implementation });
        }
        Ok(Self { pending, entry })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.entry);
    }
}

fn downcast_shared<I: Injectable>(instance: SharedInstance) -> Result<Arc<I>, ContainerError> {
    instance
        .downcast::<I>()
        .map_err(|_| ContainerError::TypeMismatch {
            contract: type_name::<I>(),
            implementation: type_name::<I>(),
        })
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.bindings
                    .values()
                    .map(|binding| (binding.contract, binding.implementation)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Display;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English {
        punctuation: Arc<Punctuation>,
    }

    struct Punctuation(&'static str);

    impl Greeter for English {
        fn greet(&self) -> String {
            format!("hello{}", self.punctuation.0)
        }
    }

    impl Injectable for English {
        fn construct(container: &Container) -> Result<Self, ContainerError> {
            let punctuation = if container.has::<Punctuation>() {
                container.get::<Punctuation>()?
            } else {
                Arc::new(Punctuation(""))
            };
            Ok(English { punctuation })
        }
    }

    impl Provides<dyn Greeter> for English {
        fn provide(self: Arc<Self>) -> Arc<dyn Greeter> {
            self
        }
    }

    static COUNTED_BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Injectable for Counted {
        fn construct(_: &Container) -> Result<Self, ContainerError> {
            COUNTED_BUILDS.fetch_add(1, Ordering::SeqCst);
            Ok(Counted)
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("broken")
        }
    }

    impl std::error::Error for Broken {}

    struct Failing;

    impl Injectable for Failing {
        fn construct(_: &Container) -> Result<Self, ContainerError> {
            Err(ContainerError::construction::<Failing>(Broken))
        }
    }

    struct SelfLoop;

    impl Injectable for SelfLoop {
        fn construct(container: &Container) -> Result<Self, ContainerError> {
            container.get::<SelfLoop>()?;
            Ok(SelfLoop)
        }
    }

    struct Ping(#[allow(dead_code)] Arc<Pong>);
    struct Pong(#[allow(dead_code)] Arc<Ping>);

    impl Injectable for Ping {
        fn construct(container: &Container) -> Result<Self, ContainerError> {
            Ok(Ping(container.get::<Pong>()?))
        }
    }

    impl Injectable for Pong {
        fn construct(container: &Container) -> Result<Self, ContainerError> {
            Ok(Pong(container.get::<Ping>()?))
        }
    }

    #[test]
    fn test_empty_container() {
        let container = Container::new();
        assert!(container.is_empty());
        assert!(!container.has::<dyn Greeter>());
        assert!(matches!(
            container.get::<dyn Greeter>(),
            Err(ContainerError::NotBound { .. })
        ));
    }

    #[test]
    fn test_bind_trait_object_contract() {
        let mut container = Container::new();
        container.bind::<dyn Greeter, English>();

        assert!(container.has::<dyn Greeter>());
        assert!(!container.has::<English>());
        assert_eq!(container.get::<dyn Greeter>().unwrap().greet(), "hello");
    }

    #[test]
    fn test_contract_and_self_binding_share_instance() {
        let mut container = Container::new();
        container
            .bind::<dyn Greeter, English>()
            .bind::<English, English>();

        let by_contract = container.get::<dyn Greeter>().unwrap();
        let by_type = container.get::<English>().unwrap();
        assert_eq!(
            Arc::as_ptr(&by_contract) as *const (),
            Arc::as_ptr(&by_type) as *const ()
        );
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut container = Container::new();
        container.bind::<dyn Greeter, English>();
        container.bind::<dyn Greeter, English>();

        assert_eq!(container.len(), 1);
        assert!(container
            .implementation_of::<dyn Greeter>()
            .unwrap()
            .ends_with("English"));
    }

    #[test]
    fn test_implementation_constructed_once() {
        let mut container = Container::new();
        container.bind::<Counted, Counted>();

        let first = container.get::<Counted>().unwrap();
        let second = container.get::<Counted>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(COUNTED_BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bind_instance_feeds_construction() {
        let mut container = Container::new();
        container
            .bind_instance(Punctuation("!"))
            .bind::<dyn Greeter, English>();

        assert_eq!(container.get::<dyn Greeter>().unwrap().greet(), "hello!");
    }

    #[test]
    fn test_construction_error_propagates() {
        let mut container = Container::new();
        container.bind::<Failing, Failing>();

        let err = container.get::<Failing>().err().unwrap();
        assert!(matches!(err, ContainerError::Construction { .. }));
        assert!(err.to_string().ends_with("broken"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut container = Container::new();
        container.bind::<SelfLoop, SelfLoop>();

        let err = container.get::<SelfLoop>().err().unwrap();
        assert!(matches!(
            err,
            ContainerError::Cycle { implementation } if implementation.ends_with("SelfLoop")
        ));
        // The failed attempt leaves nothing pending behind.
        assert!(matches!(
            container.get::<SelfLoop>(),
            Err(ContainerError::Cycle { .. })
        ));
        assert!(lock(&container.pending).is_empty());
    }

    #[test]
    fn test_mutual_dependency_is_a_cycle() {
        let mut container = Container::new();
        container.bind::<Ping, Ping>().bind::<Pong, Pong>();

        let err = container.get::<Ping>().err().unwrap();
        assert!(matches!(
            err,
            ContainerError::Cycle { implementation } if implementation.ends_with("Ping")
        ));
        assert!(err.to_string().starts_with("dependency cycle while constructing"));
    }

    #[test]
    fn test_debug_lists_bindings() {
        let mut container = Container::new();
        container.bind::<dyn Greeter, English>();
        let rendered = format!("{container:?}");
        assert!(rendered.contains("Greeter"));
        assert!(rendered.contains("English"));
    }
}
