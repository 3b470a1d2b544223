#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Template helper API for canopy
//!
//! [`Site`] holds what lives for the whole process: configuration, the
//! content store, the permission checker, the frozen slot registry and
//! the view dispatcher. For each request it hands out a [`TemplateApi`],
//! the object page templates read titles, navigation, slots and links
//! from. The [`register`] module implements self-registration and [`html`]
//! escapes values interpolated into markup.

pub mod format;
pub mod html;
mod links;
pub mod register;
mod site;
mod template;
mod types;

pub use format::DateFormat;
pub use links::{default_edit_links, ViewLink};
pub use register::{register, FormState, MemoryUsers, NewUser, RegisterOutcome, UserSink};
pub use site::Site;
pub use template::TemplateApi;
pub use types::{default_content_types, ContentType};
