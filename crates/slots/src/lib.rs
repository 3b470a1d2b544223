#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Slot registry and per-request slot resolution for canopy
//!
//! A page layout declares named insertion points ([`SlotName`]). Feature
//! code binds views to them once at startup through
//! [`SlotRegistryBuilder`]; the frozen [`SlotRegistry`] is then shared by
//! every request. During a request, a [`SlotResolver`] renders a slot on
//! first access by dispatching each matching assignment through a
//! [`ViewDispatcher`], and memoizes the fragments for the rest of the
//! request.
//!
//! ## Example
//!
//! ```
//! use canopy_slots::{SlotRegistryBuilder, SlotResolver, ViewOutput, ViewRegistry};
//! use canopy_types::{NodeId, Request, SlotName};
//! use std::collections::BTreeMap;
//!
//! let mut views = ViewRegistry::new();
//! views.add_view("hello", None, |_ctx| Ok(ViewOutput::from("Hello world!")));
//!
//! let mut builder = SlotRegistryBuilder::new();
//! builder.assign("hello", "right", None, BTreeMap::new()).unwrap();
//! let registry = builder.build();
//!
//! let request = Request::get();
//! let mut slots = SlotResolver::new(&registry, &views, NodeId(1), &request);
//! assert_eq!(slots.resolve(SlotName::Right).unwrap(), ["Hello world!"]);
//! ```

mod dispatch;
mod predicate;
mod registry;
mod resolver;

pub use canopy_types::SlotName;
pub use dispatch::{ViewContext, ViewDispatcher, ViewFn, ViewOutput, ViewRegistry};
pub use predicate::Predicate;
pub use registry::{SlotAssignment, SlotHandler, SlotRegistry, SlotRegistryBuilder};
pub use resolver::{SlotCache, SlotResolver};
