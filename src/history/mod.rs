//! # Dispatch History
//!
//! Counts how often each command was dispatched so the built-in
//! "Recent Commands" view can list the most used ones.
//!
//! ## Data Format
//!
//! ```json
//! {
//!   "entries": {
//!     "Vault/Secrets::Delete": {
//!       "category": "Vault/Secrets",
//!       "label": "Delete",
//!       "count": 7,
//!       "last_used": "2026-02-05T10:30:00Z"
//!     }
//!   }
//! }
//! ```

mod storage;

pub use storage::{
    format_recent, DispatchHistory, HistoryEntry, HistoryTracker, MAX_RECENT_COMMANDS,
};
