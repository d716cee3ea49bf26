/*
 * Derives the navigation tree for an opened document from its header
 * summaries. The build is a pure function of the two summaries plus the
 * display name: identical headers always yield the identical node order, and
 * the tree is rebuilt wholesale on every open rather than patched in place.
 *
 * Node order is load-bearing (it defines tab-opening order): General and
 * Sections always come first, then one node per present data directory in
 * `DirectoryKind::ALL` order, then Dependencies for DLL images. View
 * instances are requested from the injected factory, one call per node,
 * never cached across rebuilds.
 */
use super::models::{FileHeaderSummary, OptionalHeaderSummary, ViewId};
use super::views::{self, ViewFactoryOperations, ViewInstance};
use crate::core::models::DirectoryKind;
use std::rc::Rc;

pub struct NavigationNode {
    pub label: String,
    pub icon: Option<&'static str>,
    view: Option<Rc<dyn ViewInstance>>,
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    // The root node carries no view; every child carries exactly one.
    pub fn view(&self) -> Option<&Rc<dyn ViewInstance>> {
        self.view.as_ref()
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.view.as_ref().map(|view| view.view_id())
    }

    fn for_view(view: Rc<dyn ViewInstance>, icon: Option<&'static str>) -> Self {
        NavigationNode {
            label: view.title().to_string(),
            icon,
            view: Some(view),
            children: Vec::new(),
        }
    }
}

impl std::fmt::Debug for NavigationNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationNode")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("view_id", &self.view_id())
            .field("children", &self.children)
            .finish()
    }
}

fn icon_for_view(view_id: ViewId) -> Option<&'static str> {
    match view_id {
        ViewId::Resources => Some("resources.ico"),
        ViewId::LoadConfig => Some("config.ico"),
        _ => None,
    }
}

/*
 * Builds the tree for a document. The root represents the document itself
 * (label = display file name); children are appended in the fixed order
 * described in the module header. Factory failures abort the build and
 * propagate to the caller.
 */
pub fn build_navigation_tree(
    file_header: &FileHeaderSummary,
    optional_header: &OptionalHeaderSummary,
    display_name: &str,
    view_factory: &dyn ViewFactoryOperations,
) -> views::Result<NavigationNode> {
    let mut root = NavigationNode {
        label: display_name.to_string(),
        icon: Some("data.ico"),
        view: None,
        children: Vec::new(),
    };

    root.children
        .push(NavigationNode::for_view(view_factory.create(ViewId::General)?, None));
    root.children
        .push(NavigationNode::for_view(view_factory.create(ViewId::Sections)?, None));

    for kind in DirectoryKind::ALL {
        if optional_header.directory(kind).is_present() {
            let view_id = ViewId::for_directory(kind);
            root.children.push(NavigationNode::for_view(
                view_factory.create(view_id)?,
                icon_for_view(view_id),
            ));
        }
    }

    if file_header.is_dll() {
        root.children.push(NavigationNode::for_view(
            view_factory.create(ViewId::Dependencies)?,
            None,
        ));
    }

    log::debug!(
        "TreeBuilder: Built navigation tree for '{display_name}' with {} nodes.",
        root.children.len()
    );
    Ok(root)
}

/*
 * Locates the child node bound to `view_id` under `root`. The builder emits
 * at most one node per view id, so the first match is the only match.
 */
pub fn find_view_node<'a>(root: &'a NavigationNode, view_id: ViewId) -> Option<&'a NavigationNode> {
    root.children
        .iter()
        .find(|node| node.view_id() == Some(view_id))
}
