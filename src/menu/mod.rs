//! # Menu Model
//!
//! The data the navigator moves through.
//!
//! - [`Item`] - a selectable node whose [`ItemKind`] decides what activation does
//! - [`Screen`] - an ordered, filterable, scrollable list of items titled by
//!   its breadcrumb
//!
//! ## Breadcrumbs
//!
//! Every screen below the root is titled with the `/`-joined titles of the
//! items that led to it. The root title ([`ROOT_TITLE`]) is never part of a
//! breadcrumb, so entering `Vault` then `Secrets` yields `Vault/Secrets`.
//! Breadcrumbs double as command registry categories, which is why
//! [`child_breadcrumb`] is the only place they are built.

pub mod item;
pub mod screen;

pub use item::{
    produce_detail, produce_items, ActionFn, DetailProducer, Item, ItemKind, ItemsProducer,
    ParamActionFn, Prompt, ERROR_TITLE,
};
pub use screen::{child_breadcrumb, Screen, ROOT_TITLE, SEPARATOR};
