//! # Dispatch
//!
//! Routes what the navigator selected to the code that acts on it.
//!
//! - [`CommandRegistry`] - categories (`"Vault/Secrets/Delete"`) mapped to handlers
//! - [`Dispatcher`] - the outer loop: build the root menu, navigate, resolve
//!   the breadcrumb, run the handler, run any deferred action, repeat
//!
//! ## Cycle
//!
//! ```text
//! menus() -> Screen::root -> Frontend::navigate -> Selection
//!                                                     |
//!           registry.resolve(category, label) <-------+
//!                   |
//!           handler(label, args) -> pause?   then   pending.run()
//!                   |
//!           Frontend::acknowledge (q ends the loop)
//! ```

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{Acknowledgement, Dispatcher, Flow, Frontend, MenuSource};
pub use registry::{CommandRegistry, Handler};
