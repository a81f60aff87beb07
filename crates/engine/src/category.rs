use serde::{Deserialize, Serialize};
use ting_shell_core::{Category, CategorySelection};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum CategoryEvent {
    /// Full catalog (re)load; replaces the previous set wholesale.
    Catalog(Vec<Category>),
    /// Route-driven selection change.
    Selection(CategorySelection),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResolvedCategoryState {
    pub categories: Vec<Category>,
    pub current_category: Option<Category>,
    pub sub_categories: Vec<String>,
}

/// Merges the catalog and the selection stream into a resolved current
/// category. The two upstreams race with no ordering guarantee; a selection
/// arriving before the catalog is held as pending and resolved when the
/// catalog lands, and a catalog (re)load re-resolves against the last-seen
/// selection.
#[derive(Debug, Default)]
pub struct CategorySynchronizer {
    categories: Vec<Category>,
    selected_pinyin: String,
    sub_categories: Vec<String>,
    current: Option<Category>,
}

impl CategorySynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: CategoryEvent) -> ResolvedCategoryState {
        match event {
            CategoryEvent::Catalog(categories) => {
                self.categories = categories;
                self.resolve();
            }
            CategoryEvent::Selection(selection) => {
                // sub_categories refresh unconditionally; they change
                // independently of the resolved category (deep links into a
                // different filter of the same category).
                self.sub_categories = selection.sub_categories;
                if selection.pinyin == self.selected_pinyin {
                    debug!(pinyin = %selection.pinyin, "selection unchanged; skipping resolution");
                } else {
                    self.selected_pinyin = selection.pinyin;
                    if !self.categories.is_empty() {
                        self.resolve();
                    }
                }
            }
        }
        self.state()
    }

    pub fn state(&self) -> ResolvedCategoryState {
        ResolvedCategoryState {
            categories: self.categories.clone(),
            current_category: self.current.clone(),
            sub_categories: self.sub_categories.clone(),
        }
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.current.as_ref()
    }

    /// Exact-match lookup by pinyin; no match means absent, not an error and
    /// never a stale previous value.
    fn resolve(&mut self) {
        self.current = self
            .categories
            .iter()
            .find(|category| category.pinyin == self.selected_pinyin)
            .cloned();
    }
}
