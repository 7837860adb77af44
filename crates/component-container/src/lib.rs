//! Minimal injection container.
//!
//! A [`Container`] maps contract identifiers to concrete implementations. A
//! contract is any `'static` type, trait objects included, so consumers can
//! depend on `dyn Trait` while start-up code decides which implementation backs
//! it. Implementations are built once through [`Injectable`] and shared by every
//! contract bound to them.
//!
//! # Example
//!
//! ```
//! use component_container::{Container, ContainerError, Injectable, Provides};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Injectable for English {
//!     fn construct(_: &Container) -> Result<Self, ContainerError> {
//!         Ok(English)
//!     }
//! }
//!
//! impl Provides<dyn Greeter> for English {
//!     fn provide(self: Arc<Self>) -> Arc<dyn Greeter> {
//!         self
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.bind::<dyn Greeter, English>();
//!
//! let greeter = container.get::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

pub mod container;
pub mod error;
pub mod provide;
pub mod registrar;

pub use container::Container;
pub use error::ContainerError;
pub use provide::{Injectable, Provides};
pub use registrar::ComponentRegistrar;
