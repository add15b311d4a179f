//! # Command Registry
//!
//! Maps `/`-delimited categories (`"Vault/Secrets/Delete"`) to command
//! handlers. The registry is built once during startup and only read
//! afterwards.
//!
//! ## Lookup
//!
//! A registered category matches a candidate when it is a literal prefix of
//! it: `"Vault/Secrets"` matches `"Vault/Secrets/List"` and
//! `"Vault/SecretsArchive"` but not `"Ops/Vault/Secrets"`. When several
//! categories match, the longest wins. Keys live in a [`BTreeMap`], so lookups
//! never depend on hash order.

use crate::menu::{child_breadcrumb, SEPARATOR};
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A command handler receives the chosen label plus any collected arguments
/// and returns whether the caller should wait for an acknowledgment keystroke
/// before redrawing the menu.
pub type Handler = Arc<dyn Fn(&str, &[String]) -> Result<bool> + Send + Sync>;

#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Handler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under the category formed by joining `parts`.
    ///
    /// Re-registering a category replaces the previous handler. An empty
    /// category would match every candidate and is ignored.
    pub fn register<F>(&mut self, handler: F, parts: &[&str])
    where
        F: Fn(&str, &[String]) -> Result<bool> + Send + Sync + 'static,
    {
        self.register_handler(Arc::new(handler), parts);
    }

    pub fn register_handler(&mut self, handler: Handler, parts: &[&str]) {
        let category = parts.join(SEPARATOR);
        if category.is_empty() {
            log::warn!("Ignoring handler registered without a category");
            return;
        }
        if self.handlers.insert(category.clone(), handler).is_some() {
            log::debug!("Replaced handler for category '{}'", category);
        }
    }

    /// Find the handler for `candidate`, preferring the most specific category.
    pub fn lookup(&self, candidate: &str) -> Option<Handler> {
        if candidate.is_empty() {
            return None;
        }
        self.handlers
            .iter()
            .filter(|(category, _)| candidate.starts_with(category.as_str()))
            .max_by_key(|(category, _)| category.len())
            .map(|(_, handler)| Arc::clone(handler))
    }

    /// Resolve a navigator selection: the breadcrumb itself first, then the
    /// breadcrumb extended with the chosen label for leaves registered one
    /// level deeper than their menu. Labels chosen on the root screen resolve
    /// to the bare label.
    pub fn resolve(&self, breadcrumb: &str, label: &str) -> Option<Handler> {
        self.lookup(breadcrumb).or_else(|| {
            if label.is_empty() {
                None
            } else {
                self.lookup(&child_breadcrumb(breadcrumb, label))
            }
        })
    }

    /// Merge `other` into this registry; its entries win on collision.
    pub fn combine(&mut self, other: CommandRegistry) {
        self.handlers.extend(other.handlers);
    }

    pub fn contains(&self, category: &str) -> bool {
        self.handlers.contains_key(category)
    }

    /// Registered categories in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
