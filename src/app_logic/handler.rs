use crate::app_logic::commands::CommandId;
use crate::core::{
    ConfigManagerOperations, DialogServiceOperations, DocumentHandle, ImageParserOperations,
    NavigationNode, NotificationServiceOperations, ParserError, ProcessLauncherOperations,
    RecentFilesList, TabRegistry, ViewError, ViewFactoryOperations, ViewId, ViewInstance,
    build_navigation_tree, find_view_node,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

pub(crate) const APP_NAME: &str = "PE Inspect";
const OPEN_FILE_FILTER: &str = "PE files (*.exe, *.dll, *.sys, *.ocx, *.obj)";

#[derive(Debug)]
pub enum OpenError {
    Parser(ParserError),
    View(ViewError),
}

impl From<ParserError> for OpenError {
    fn from(err: ParserError) -> Self {
        OpenError::Parser(err)
    }
}

impl From<ViewError> for OpenError {
    fn from(err: ViewError) -> Self {
        OpenError::View(err)
    }
}

impl std::fmt::Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenError::Parser(e) => write!(f, "{e}"),
            OpenError::View(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenError::Parser(e) => Some(e),
            OpenError::View(e) => Some(e),
        }
    }
}

/*
 * The session controller for a single opened document. Owns the document
 * handle (at most one), the navigation tree derived from its headers, the
 * tab registry, and the recent-files list; everything else is reached
 * through the injected service traits.
 *
 * The session is a two-state machine (Closed / Open). Every transition runs
 * to completion before the next begins, and the command-enablement table is
 * re-derived at the end of each transition so it is never stale.
 */
pub struct DocumentSession {
    document: Option<DocumentHandle>,
    tree_root: Option<NavigationNode>,
    tabs: TabRegistry,
    recent_files: RecentFilesList,
    command_states: HashMap<CommandId, bool>,
    parser: Arc<dyn ImageParserOperations>,
    view_factory: Box<dyn ViewFactoryOperations>,
    dialog_service: Arc<dyn DialogServiceOperations>,
    notification_service: Arc<dyn NotificationServiceOperations>,
    process_launcher: Arc<dyn ProcessLauncherOperations>,
    config_manager: Arc<dyn ConfigManagerOperations>,
}

impl DocumentSession {
    /*
     * Builds a session in the Closed state. The persisted recent-files list
     * is loaded here; a load failure is logged and treated as an empty list,
     * never surfaced as an error.
     */
    pub fn new(
        parser: Arc<dyn ImageParserOperations>,
        view_factory: Box<dyn ViewFactoryOperations>,
        dialog_service: Arc<dyn DialogServiceOperations>,
        notification_service: Arc<dyn NotificationServiceOperations>,
        process_launcher: Arc<dyn ProcessLauncherOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
    ) -> Self {
        let recent_files = match config_manager.load_recent_files(APP_NAME) {
            Ok(Some(entries)) => RecentFilesList::from_entries(entries),
            Ok(None) => RecentFilesList::new(),
            Err(e) => {
                log::warn!("DocumentSession: Failed to load recent files: {e}");
                RecentFilesList::new()
            }
        };

        let mut session = DocumentSession {
            document: None,
            tree_root: None,
            tabs: TabRegistry::new(),
            recent_files,
            command_states: HashMap::new(),
            parser,
            view_factory,
            dialog_service,
            notification_service,
            process_launcher,
            config_manager,
        };
        session.sync_command_states();
        session
    }

    // --- State queries ---

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn tree(&self) -> Option<&NavigationNode> {
        self.tree_root.as_ref()
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn recent_files(&self) -> &RecentFilesList {
        &self.recent_files
    }

    pub fn window_title(&self) -> String {
        match &self.document {
            Some(document) => format!("{APP_NAME} ({})", document.path().display()),
            None => APP_NAME.to_string(),
        }
    }

    // Reads the table derived at the last transition, not a live predicate.
    pub fn is_enabled(&self, command: CommandId) -> bool {
        self.command_states.get(&command).copied().unwrap_or(false)
    }

    // --- Transitions ---

    /*
     * Opens `path`. With `spawn_separate` the file is handed to a freshly
     * launched instance and this session stays untouched; otherwise the
     * current document (if any) is closed first, unconditionally, and the
     * new one is acquired. On any failure the error is surfaced through the
     * notification service and the session remains Closed -- the previous
     * document is not restored.
     */
    pub fn open(&mut self, path: &Path, spawn_separate: bool) {
        if spawn_separate {
            self.spawn_separate_instance(path);
            return;
        }

        self.close();
        if let Err(e) = self.open_internal(path) {
            log::error!("DocumentSession: Failed to open {path:?}: {e}");
            self.notification_service
                .show(&format!("Error: {e}"), APP_NAME);
        }
        self.sync_command_states();
    }

    fn open_internal(&mut self, path: &Path) -> Result<(), OpenError> {
        let document = DocumentHandle::acquire(self.parser.as_ref(), path)?;
        let tree_root = build_navigation_tree(
            document.file_header(),
            document.optional_header(),
            document.file_name(),
            self.view_factory.as_ref(),
        )?;

        // The general view is always the first child; it seeds the tab
        // registry and becomes the initial selection.
        if let Some(general) = tree_root.children.first().and_then(|node| node.view()) {
            let general = Rc::clone(general);
            self.tabs.select(&general);
        }

        self.recent_files
            .touch(&path.to_string_lossy());
        log::info!(
            "DocumentSession: Opened {path:?} ({} navigation nodes).",
            tree_root.children.len()
        );
        self.tree_root = Some(tree_root);
        self.document = Some(document);
        Ok(())
    }

    /*
     * Closes the current document: the parser resource is released, the
     * navigation tree, tab registry and selection are cleared. Idempotent;
     * from the Closed state it still clears transient view state.
     */
    pub fn close(&mut self) {
        if let Some(mut document) = self.document.take() {
            log::info!("DocumentSession: Closing {:?}.", document.path());
            // Release failures are non-fatal; the handle is discarded anyway.
            if let Err(e) = document.release() {
                log::warn!(
                    "DocumentSession: Failed to release parser resource for {:?}: {e}",
                    document.path()
                );
            }
        }
        self.tree_root = None;
        self.tabs.clear();
        self.sync_command_states();
    }

    /*
     * Opens several files at once: the first in this session, each further
     * one in its own separate instance.
     */
    pub fn open_paths(&mut self, paths: &[PathBuf]) {
        for (index, path) in paths.iter().enumerate() {
            self.open(path, index > 0);
        }
    }

    pub fn open_from_dialog(&mut self, spawn_separate: bool) {
        match self
            .dialog_service
            .prompt_for_file_to_open(OPEN_FILE_FILTER, "Select File")
        {
            Some(path) => self.open(&path, spawn_separate),
            None => log::debug!("DocumentSession: Open dialog cancelled."),
        }
    }

    // --- View navigation ---

    /*
     * Activates the view behind a navigation node, registering it as a tab
     * first if needed. `None` (the tree root, or nothing resolved) is
     * ignored.
     */
    pub fn select_view(&mut self, view: Option<Rc<dyn ViewInstance>>) {
        let Some(view) = view else {
            return;
        };
        if self.document.is_none() {
            log::warn!("DocumentSession: select_view called with no open document, ignoring.");
            return;
        }
        self.tabs.select(&view);
    }

    /*
     * Removes a tab. If it was selected, the selection becomes empty; no
     * neighboring tab is promoted.
     */
    pub fn close_view(&mut self, view: &Rc<dyn ViewInstance>) {
        self.tabs.remove(view);
    }

    fn select_view_by_id(&mut self, view_id: ViewId) {
        let view = self
            .tree_root
            .as_ref()
            .and_then(|root| find_view_node(root, view_id))
            .and_then(|node| node.view())
            .cloned();
        match view {
            Some(view) => self.tabs.select(&view),
            // The enablement predicate and the tree are derived from the same
            // headers, so an enabled view command always finds its node.
            None => log::error!(
                "DocumentSession: No navigation node for {view_id:?}; tree out of sync."
            ),
        }
    }

    // --- Command surface ---

    /*
     * Executes a command. Consumers are expected to gate on `is_enabled`
     * first; a disabled command arriving anyway is a logged no-op.
     */
    pub fn execute(&mut self, command: CommandId) {
        if !self.is_enabled(command) {
            log::warn!("DocumentSession: Command {command:?} invoked while disabled, ignoring.");
            return;
        }
        match command {
            CommandId::Open => self.open_from_dialog(false),
            CommandId::OpenNewInstance => self.open_from_dialog(true),
            CommandId::Close => self.close(),
            _ => {
                if let Some(view_id) = command.view_id() {
                    self.select_view_by_id(view_id);
                }
            }
        }
    }

    /*
     * Session teardown: persists the recent-files list. Failures are logged
     * and swallowed; there is nothing actionable at exit.
     */
    pub fn shutdown(&mut self) {
        if let Err(e) = self
            .config_manager
            .save_recent_files(APP_NAME, self.recent_files.entries())
        {
            log::warn!("DocumentSession: Failed to save recent files: {e}");
        }
    }

    // --- Internals ---

    fn spawn_separate_instance(&self, path: &Path) {
        let executable = match std::env::current_exe() {
            Ok(executable) => executable,
            Err(e) => {
                log::error!("DocumentSession: Could not determine own executable path: {e}");
                self.notification_service
                    .show(&format!("Error: {e}"), APP_NAME);
                return;
            }
        };
        if let Err(e) = self.process_launcher.spawn(&executable, path) {
            log::error!("DocumentSession: Failed to spawn separate instance for {path:?}: {e}");
            self.notification_service
                .show(&format!("Error: {e}"), APP_NAME);
        }
    }

    fn sync_command_states(&mut self) {
        for command in CommandId::ALL {
            self.command_states
                .insert(command, command.is_enabled(self.document.as_ref()));
        }
        log::trace!(
            "DocumentSession: Command states re-derived (document open: {}).",
            self.document.is_some()
        );
    }
}
