use super::item::Item;

/// Title of the root screen. It names the product and is never part of a
/// breadcrumb.
pub const ROOT_TITLE: &str = "OpsDeck";

/// Separator between breadcrumb segments, shared with registry categories.
pub const SEPARATOR: &str = "/";

/// Breadcrumb of a screen entered from `parent` through the item `title`.
pub fn child_breadcrumb(parent: &str, title: &str) -> String {
    if parent == ROOT_TITLE || parent.is_empty() {
        title.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, title)
    }
}

/// One navigable list of items.
#[derive(Debug, Clone)]
pub struct Screen {
    pub title: String,
    items: Vec<Item>,
    filter: String,
    /// Index into [`Screen::visible_items`].
    selected: usize,
    /// First visible row of the viewport.
    offset: usize,
    /// Number of rows the viewport can show; at least one.
    height: usize,
}

impl Screen {
    pub fn new(title: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            title: title.into(),
            items,
            filter: String::new(),
            selected: 0,
            offset: 0,
            height: 1,
        }
    }

    /// The root screen listing every top-level category menu.
    pub fn root(items: Vec<Item>) -> Self {
        Self::new(ROOT_TITLE, items)
    }

    pub fn is_root(&self) -> bool {
        self.title == ROOT_TITLE
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Items matching the current filter, in their original order.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.matches(&self.filter))
            .collect()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.visible_items().get(self.selected).copied()
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.selected = 0;
        self.offset = 0;
    }

    pub fn filter_push(&mut self, c: char) {
        let mut filter = std::mem::take(&mut self.filter);
        filter.push(c);
        self.set_filter(filter);
    }

    pub fn filter_pop(&mut self) {
        let mut filter = std::mem::take(&mut self.filter);
        filter.pop();
        self.set_filter(filter);
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.scroll_into_view();
    }

    /// Move down one row, wrapping to the top.
    pub fn next(&mut self) {
        let count = self.visible_items().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
            self.scroll_into_view();
        }
    }

    /// Move up one row, wrapping to the bottom.
    pub fn previous(&mut self) {
        let count = self.visible_items().len();
        if count > 0 {
            self.selected = if self.selected > 0 {
                self.selected - 1
            } else {
                count - 1
            };
            self.scroll_into_view();
        }
    }

    pub fn page_down(&mut self) {
        let count = self.visible_items().len();
        if count > 0 {
            self.selected = (self.selected + self.height).min(count - 1);
            self.scroll_into_view();
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.height);
        self.scroll_into_view();
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.scroll_into_view();
    }

    pub fn last(&mut self) {
        self.selected = self.visible_items().len().saturating_sub(1);
        self.scroll_into_view();
    }

    fn scroll_into_view(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.height {
            self.offset = self.selected + 1 - self.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item::dispatch(format!("Item {}", i), ""))
            .collect()
    }

    #[test]
    fn test_child_breadcrumb_skips_root_title() {
        assert_eq!(child_breadcrumb(ROOT_TITLE, "Vault"), "Vault");
        assert_eq!(child_breadcrumb("Vault", "Secrets"), "Vault/Secrets");
        assert_eq!(
            child_breadcrumb("Vault/Secrets", "Delete"),
            "Vault/Secrets/Delete"
        );
    }

    #[test]
    fn test_navigation_wraps() {
        let mut screen = Screen::new("Menu", numbered(3));
        screen.previous();
        assert_eq!(screen.selected(), 2);
        screen.next();
        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn test_navigation_on_empty_screen_is_noop() {
        let mut screen = Screen::new("Empty", Vec::new());
        screen.next();
        screen.previous();
        screen.page_down();
        screen.last();
        assert_eq!(screen.selected(), 0);
        assert!(screen.selected_item().is_none());
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut screen = Screen::new("Menu", numbered(10));
        screen.set_height(3);
        for _ in 0..4 {
            screen.next();
        }
        assert_eq!(screen.selected(), 4);
        assert_eq!(screen.offset(), 2);

        screen.first();
        assert_eq!(screen.offset(), 0);

        screen.last();
        assert_eq!(screen.selected(), 9);
        assert_eq!(screen.offset(), 7);

        screen.page_up();
        assert_eq!(screen.selected(), 6);
        assert_eq!(screen.offset(), 6);
    }

    #[test]
    fn test_filter_narrows_and_resets_cursor() {
        let items = vec![
            Item::dispatch("List", "List secrets"),
            Item::dispatch("Delete", "Delete a secret"),
            Item::dispatch("Merge", "Merge kubeconfig"),
        ];
        let mut screen = Screen::new("Vault", items);
        screen.next();
        screen.filter_push('s');
        screen.filter_push('e');
        screen.filter_push('c');
        assert_eq!(screen.selected(), 0);
        let titles: Vec<&str> = screen
            .visible_items()
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, ["List", "Delete"]);

        screen.filter_pop();
        screen.filter_pop();
        screen.filter_pop();
        assert_eq!(screen.visible_items().len(), 3);
    }
}
