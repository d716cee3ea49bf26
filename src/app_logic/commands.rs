/*
 * The user-facing command surface and its enablement predicates. Every
 * command's availability is a pure function of the current document state;
 * the session re-derives the whole table after each open/close transition so
 * consumers always observe predicates consistent with the state they see.
 */
use crate::core::{DirectoryKind, DocumentHandle, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Open,
    OpenNewInstance,
    Close,
    ViewGeneral,
    ViewSections,
    ViewExports,
    ViewImports,
    ViewResources,
    ViewDebug,
    ViewLoadConfig,
    ViewDependencies,
}

impl CommandId {
    pub const ALL: [CommandId; 11] = [
        CommandId::Open,
        CommandId::OpenNewInstance,
        CommandId::Close,
        CommandId::ViewGeneral,
        CommandId::ViewSections,
        CommandId::ViewExports,
        CommandId::ViewImports,
        CommandId::ViewResources,
        CommandId::ViewDebug,
        CommandId::ViewLoadConfig,
        CommandId::ViewDependencies,
    ];

    // The view a `View*` command navigates to; `None` for lifecycle commands.
    pub fn view_id(self) -> Option<ViewId> {
        match self {
            CommandId::ViewGeneral => Some(ViewId::General),
            CommandId::ViewSections => Some(ViewId::Sections),
            CommandId::ViewExports => Some(ViewId::Exports),
            CommandId::ViewImports => Some(ViewId::Imports),
            CommandId::ViewResources => Some(ViewId::Resources),
            CommandId::ViewDebug => Some(ViewId::Debug),
            CommandId::ViewLoadConfig => Some(ViewId::LoadConfig),
            CommandId::ViewDependencies => Some(ViewId::Dependencies),
            CommandId::Open | CommandId::OpenNewInstance | CommandId::Close => None,
        }
    }

    pub fn for_view(view_id: ViewId) -> CommandId {
        match view_id {
            ViewId::General => CommandId::ViewGeneral,
            ViewId::Sections => CommandId::ViewSections,
            ViewId::Exports => CommandId::ViewExports,
            ViewId::Imports => CommandId::ViewImports,
            ViewId::Resources => CommandId::ViewResources,
            ViewId::Debug => CommandId::ViewDebug,
            ViewId::LoadConfig => CommandId::ViewLoadConfig,
            ViewId::Dependencies => CommandId::ViewDependencies,
        }
    }

    /*
     * The enablement predicate. Open commands are always available; the rest
     * require an open document, and the directory-backed view commands
     * additionally require their directory's address to be nonzero
     * (Dependencies: the DLL characteristic).
     */
    pub fn is_enabled(self, document: Option<&DocumentHandle>) -> bool {
        match self {
            CommandId::Open | CommandId::OpenNewInstance => true,
            CommandId::Close | CommandId::ViewGeneral | CommandId::ViewSections => {
                document.is_some()
            }
            CommandId::ViewExports => directory_present(document, DirectoryKind::Export),
            CommandId::ViewImports => directory_present(document, DirectoryKind::Import),
            CommandId::ViewResources => directory_present(document, DirectoryKind::Resource),
            CommandId::ViewDebug => directory_present(document, DirectoryKind::Debug),
            CommandId::ViewLoadConfig => directory_present(document, DirectoryKind::LoadConfig),
            CommandId::ViewDependencies => {
                document.is_some_and(|doc| doc.file_header().is_dll())
            }
        }
    }
}

fn directory_present(document: Option<&DocumentHandle>, kind: DirectoryKind) -> bool {
    document.is_some_and(|doc| doc.optional_header().directory(kind).is_present())
}
