/*
 * View instances and the factory that creates them. A view instance is the
 * per-tab object the registry and the navigation tree hand around; rendering
 * proper lives outside this core, so a view only knows its identity, its tab
 * title, and how to summarize itself in one line for the CLI surface.
 *
 * The factory is injected wherever views are created (notably the tree
 * builder) instead of being reached through any process-wide container, and
 * it returns a fresh instance on every call.
 */
use super::document::DocumentHandle;
use super::models::{DirectoryKind, ViewId};
use std::rc::Rc;

#[derive(Debug)]
pub enum ViewError {
    CreationFailed(String),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::CreationFailed(reason) => {
                write!(f, "Could not create view: {reason}")
            }
        }
    }
}

impl std::error::Error for ViewError {}

pub type Result<T> = std::result::Result<T, ViewError>;

pub trait ViewInstance {
    fn view_id(&self) -> ViewId;
    fn title(&self) -> &'static str;
    // One-line rendition of the view for the CLI `show` command.
    fn describe(&self, document: &DocumentHandle) -> String;
}

pub trait ViewFactoryOperations {
    fn create(&self, view_id: ViewId) -> Result<Rc<dyn ViewInstance>>;
}

pub struct CoreViewFactory {}

impl CoreViewFactory {
    pub fn new() -> Self {
        CoreViewFactory {}
    }
}

impl Default for CoreViewFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFactoryOperations for CoreViewFactory {
    fn create(&self, view_id: ViewId) -> Result<Rc<dyn ViewInstance>> {
        log::trace!("CoreViewFactory: Creating view instance for {view_id:?}");
        let view: Rc<dyn ViewInstance> = match view_id {
            ViewId::General => Rc::new(GeneralView {}),
            ViewId::Sections => Rc::new(SectionsView {}),
            ViewId::Exports => Rc::new(DirectoryView {
                id: ViewId::Exports,
                kind: DirectoryKind::Export,
                title: "Exports (.edata)",
            }),
            ViewId::Imports => Rc::new(DirectoryView {
                id: ViewId::Imports,
                kind: DirectoryKind::Import,
                title: "Imports (.idata)",
            }),
            ViewId::Resources => Rc::new(DirectoryView {
                id: ViewId::Resources,
                kind: DirectoryKind::Resource,
                title: "Resources (.rsrc)",
            }),
            ViewId::Debug => Rc::new(DirectoryView {
                id: ViewId::Debug,
                kind: DirectoryKind::Debug,
                title: "Debug (.debug)",
            }),
            ViewId::LoadConfig => Rc::new(DirectoryView {
                id: ViewId::LoadConfig,
                kind: DirectoryKind::LoadConfig,
                title: "Load Config",
            }),
            ViewId::Dependencies => Rc::new(DependenciesView {}),
        };
        Ok(view)
    }
}

struct GeneralView {}

impl ViewInstance for GeneralView {
    fn view_id(&self) -> ViewId {
        ViewId::General
    }

    fn title(&self) -> &'static str {
        "(General)"
    }

    fn describe(&self, document: &DocumentHandle) -> String {
        let file_header = document.file_header();
        let optional_header = document.optional_header();
        format!(
            "{} image, machine {} ({:#06x}), {} sections, entry point {:#x}, image base {:#x}, characteristics {:#06x}",
            optional_header.magic,
            file_header.machine_name(),
            file_header.machine,
            file_header.section_count,
            optional_header.entry_point,
            optional_header.image_base,
            file_header.characteristics.bits()
        )
    }
}

struct SectionsView {}

impl ViewInstance for SectionsView {
    fn view_id(&self) -> ViewId {
        ViewId::Sections
    }

    fn title(&self) -> &'static str {
        "Sections"
    }

    fn describe(&self, document: &DocumentHandle) -> String {
        format!(
            "{} sections declared in the file header",
            document.file_header().section_count
        )
    }
}

// All directory-backed views render the same way: the address+size pair of
// the directory they were created for.
struct DirectoryView {
    id: ViewId,
    kind: DirectoryKind,
    title: &'static str,
}

impl ViewInstance for DirectoryView {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &'static str {
        self.title
    }

    fn describe(&self, document: &DocumentHandle) -> String {
        let directory = document.optional_header().directory(self.kind);
        format!(
            "{} directory at RVA {:#x}, {} bytes",
            self.title, directory.virtual_address, directory.size
        )
    }
}

struct DependenciesView {}

impl ViewInstance for DependenciesView {
    fn view_id(&self) -> ViewId {
        ViewId::Dependencies
    }

    fn title(&self) -> &'static str {
        "Dependencies"
    }

    fn describe(&self, document: &DocumentHandle) -> String {
        format!(
            "dependency walk of {} (import directory at RVA {:#x})",
            document.file_name(),
            document.optional_header().import.virtual_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_creates_matching_view_for_every_id() {
        let factory = CoreViewFactory::new();
        for view_id in ViewId::ALL {
            let view = factory.create(view_id).unwrap();
            assert_eq!(view.view_id(), view_id);
            assert!(!view.title().is_empty());
        }
    }

    #[test]
    fn test_factory_returns_distinct_instances_per_call() {
        // The tab registry dedups by instance identity, so two requests for
        // the same view id must not alias.
        let factory = CoreViewFactory::new();
        let first = factory.create(ViewId::General).unwrap();
        let second = factory.create(ViewId::General).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_tab_titles() {
        let factory = CoreViewFactory::new();
        assert_eq!(factory.create(ViewId::General).unwrap().title(), "(General)");
        assert_eq!(
            factory.create(ViewId::Exports).unwrap().title(),
            "Exports (.edata)"
        );
        assert_eq!(
            factory.create(ViewId::LoadConfig).unwrap().title(),
            "Load Config"
        );
        assert_eq!(
            factory.create(ViewId::Dependencies).unwrap().title(),
            "Dependencies"
        );
    }
}
