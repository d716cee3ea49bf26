/*
 * The set of currently open view tabs. Semantics are set-with-order:
 * membership is tested by instance identity, insertion order is preserved,
 * and a single selection points at one member. The registry owns the view
 * instances; the selection is a weak reference and never implies ownership.
 */
use super::views::ViewInstance;
use std::rc::{Rc, Weak};

pub struct TabRegistry {
    tabs: Vec<Rc<dyn ViewInstance>>,
    selected: Option<Weak<dyn ViewInstance>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        TabRegistry {
            tabs: Vec::new(),
            selected: None,
        }
    }

    // Appends if absent; a view that is already registered stays where it is.
    pub fn add(&mut self, view: &Rc<dyn ViewInstance>) {
        if !self.contains(view) {
            self.tabs.push(Rc::clone(view));
        }
    }

    /*
     * Removes a view from the registry. If it was the current selection the
     * selection becomes empty; no neighboring tab is auto-selected.
     */
    pub fn remove(&mut self, view: &Rc<dyn ViewInstance>) {
        if self
            .selected_view()
            .is_some_and(|selected| Rc::ptr_eq(&selected, view))
        {
            self.selected = None;
        }
        self.tabs.retain(|tab| !Rc::ptr_eq(tab, view));
    }

    /*
     * Marks `view` as selected, registering it first if it is not yet a
     * member (the tree-navigation path, as opposed to clicking an already
     * open tab).
     */
    pub fn select(&mut self, view: &Rc<dyn ViewInstance>) {
        self.add(view);
        self.selected = Some(Rc::downgrade(view));
    }

    pub fn selected_view(&self) -> Option<Rc<dyn ViewInstance>> {
        self.selected.as_ref().and_then(Weak::upgrade)
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.selected = None;
    }

    pub fn contains(&self, view: &Rc<dyn ViewInstance>) -> bool {
        self.tabs.iter().any(|tab| Rc::ptr_eq(tab, view))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn ViewInstance>> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ViewId;
    use crate::core::views::{CoreViewFactory, ViewFactoryOperations};

    fn make_view(view_id: ViewId) -> Rc<dyn ViewInstance> {
        CoreViewFactory::new().create(view_id).unwrap()
    }

    #[test]
    fn test_add_is_identity_deduplicated() {
        let mut registry = TabRegistry::new();
        let general = make_view(ViewId::General);

        registry.add(&general);
        registry.add(&general);
        assert_eq!(registry.len(), 1);

        // A different instance of the same view id is a different tab.
        let other_general = make_view(ViewId::General);
        registry.add(&other_general);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_select_registers_unknown_view_at_end() {
        let mut registry = TabRegistry::new();
        let general = make_view(ViewId::General);
        let exports = make_view(ViewId::Exports);
        registry.add(&general);

        registry.select(&exports);

        let order: Vec<ViewId> = registry.iter().map(|tab| tab.view_id()).collect();
        assert_eq!(order, vec![ViewId::General, ViewId::Exports]);
        assert!(
            registry
                .selected_view()
                .is_some_and(|selected| Rc::ptr_eq(&selected, &exports))
        );
    }

    #[test]
    fn test_select_existing_member_keeps_order() {
        let mut registry = TabRegistry::new();
        let general = make_view(ViewId::General);
        let sections = make_view(ViewId::Sections);
        registry.add(&general);
        registry.add(&sections);

        registry.select(&general);

        let order: Vec<ViewId> = registry.iter().map(|tab| tab.view_id()).collect();
        assert_eq!(order, vec![ViewId::General, ViewId::Sections]);
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut registry = TabRegistry::new();
        let general = make_view(ViewId::General);
        let exports = make_view(ViewId::Exports);
        registry.select(&general);
        registry.select(&exports);

        registry.remove(&exports);

        assert!(registry.selected_view().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_unselected_keeps_selection() {
        let mut registry = TabRegistry::new();
        let general = make_view(ViewId::General);
        let exports = make_view(ViewId::Exports);
        registry.select(&general);
        registry.add(&exports);

        registry.remove(&exports);

        assert!(
            registry
                .selected_view()
                .is_some_and(|selected| Rc::ptr_eq(&selected, &general))
        );
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut registry = TabRegistry::new();
        registry.select(&make_view(ViewId::General));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.selected_view().is_none());
    }
}
