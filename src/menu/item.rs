//! # Menu Items
//!
//! An [`Item`] is the atomic menu node. What happens when it is activated is
//! decided entirely by its [`ItemKind`]: each variant owns exactly the payload
//! it needs, so an item can never carry a producer for one behavior while
//! being tagged as another.

use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Zero-argument closure carried by an [`ItemKind::Action`] item.
pub type ActionFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Closure run with the values collected by a prompt.
pub type ParamActionFn = Arc<dyn Fn(&[String]) -> Result<()> + Send + Sync>;

/// Lazily produces the items of a dynamic submenu.
pub type ItemsProducer = Arc<dyn Fn() -> Result<Vec<Item>> + Send + Sync>;

/// Produces a `(heading, body)` pair for a read-only detail view.
pub type DetailProducer = Arc<dyn Fn() -> Result<(String, String)> + Send + Sync>;

/// Title used for items and detail views that stand in for a failed producer.
pub const ERROR_TITLE: &str = "Error";

/// Ordered input labels plus the optional action fed with the collected values.
#[derive(Clone)]
pub struct Prompt {
    labels: Vec<String>,
    action: Option<ParamActionFn>,
}

impl Prompt {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn action(&self) -> Option<&ParamActionFn> {
        self.action.as_ref()
    }
}

/// Behavior of an item when the user activates it.
#[derive(Clone)]
pub enum ItemKind {
    /// Routed through the command registry using the screen's breadcrumb.
    Dispatch,
    /// Runs its own closure once the terminal has been released.
    Action(ActionFn),
    /// Static nested list.
    SubMenu(Vec<Item>),
    /// Nested list produced off the UI thread at selection time.
    DynamicSubMenu(ItemsProducer),
    /// Collects exactly one value.
    Prompt(Prompt),
    /// Collects one value per label, in order.
    MultiPrompt(Prompt),
    /// Read-only text fetched at selection time.
    Detail(DetailProducer),
    /// Informational leaf; activating it does nothing.
    Info,
}

impl ItemKind {
    /// Short lowercase name, used in logs and the `--debug` tree.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Dispatch => "dispatch",
            ItemKind::Action(_) => "action",
            ItemKind::SubMenu(_) => "menu",
            ItemKind::DynamicSubMenu(_) => "dynamic",
            ItemKind::Prompt(_) => "prompt",
            ItemKind::MultiPrompt(_) => "multi-prompt",
            ItemKind::Detail(_) => "detail",
            ItemKind::Info => "info",
        }
    }
}

/// A single selectable menu node.
#[derive(Clone)]
pub struct Item {
    pub title: String,
    pub description: String,
    kind: ItemKind,
}

impl Item {
    fn with_kind(title: impl Into<String>, description: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
        }
    }

    pub fn dispatch(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(title, description, ItemKind::Dispatch)
    }

    pub fn action<F>(title: impl Into<String>, description: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self::with_kind(title, description, ItemKind::Action(Arc::new(action)))
    }

    pub fn submenu(
        title: impl Into<String>,
        description: impl Into<String>,
        items: Vec<Item>,
    ) -> Self {
        Self::with_kind(title, description, ItemKind::SubMenu(items))
    }

    pub fn dynamic<F>(title: impl Into<String>, description: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Result<Vec<Item>> + Send + Sync + 'static,
    {
        Self::with_kind(
            title,
            description,
            ItemKind::DynamicSubMenu(Arc::new(producer)),
        )
    }

    /// Single-label prompt without an attached action; the collected value
    /// travels with the selection to the command registry.
    pub fn prompt(
        title: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            title,
            description,
            ItemKind::Prompt(Prompt {
                labels: vec![label.into()],
                action: None,
            }),
        )
    }

    /// Single-label prompt whose value is handed to `action` after the
    /// terminal has been released.
    pub fn prompt_with_action<F>(
        title: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
        action: F,
    ) -> Self
    where
        F: Fn(&[String]) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_kind(
            title,
            description,
            ItemKind::Prompt(Prompt {
                labels: vec![label.into()],
                action: Some(Arc::new(action)),
            }),
        )
    }

    /// Prompt collecting one value per label.
    ///
    /// Returns `None` when `labels` is empty: a prompt with nothing to ask
    /// cannot be collected.
    pub fn multi_prompt(
        title: impl Into<String>,
        description: impl Into<String>,
        labels: Vec<String>,
        action: Option<ParamActionFn>,
    ) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        Some(Self::with_kind(
            title,
            description,
            ItemKind::MultiPrompt(Prompt { labels, action }),
        ))
    }

    pub fn detail<F>(title: impl Into<String>, description: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Result<(String, String)> + Send + Sync + 'static,
    {
        Self::with_kind(title, description, ItemKind::Detail(Arc::new(producer)))
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(title, description, ItemKind::Info)
    }

    /// Non-actionable item standing in for a failed producer.
    pub fn error(err: &anyhow::Error) -> Self {
        Self::info(ERROR_TITLE, format!("{:#}", err))
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Case-insensitive match of `query` against title and description.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("kind", &self.kind.name())
            .finish()
    }
}

/// Run an items producer, converting a failure into a single error item.
pub fn produce_items(producer: &ItemsProducer) -> Vec<Item> {
    producer().unwrap_or_else(|e| {
        log::warn!("Submenu producer failed: {:#}", e);
        vec![Item::error(&e)]
    })
}

/// Run a detail producer, converting a failure into an error heading.
pub fn produce_detail(producer: &DetailProducer) -> (String, String) {
    producer().unwrap_or_else(|e| {
        log::warn!("Detail producer failed: {:#}", e);
        (ERROR_TITLE.to_string(), format!("{:#}", e))
    })
}
