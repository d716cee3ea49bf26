/*
 * This module consolidates the core, UI-agnostic logic of the application.
 * It re-exports the document/session data structures and the abstractions
 * (`ImageParserOperations`, `ViewFactoryOperations`, `ConfigManagerOperations`,
 * `DialogServiceOperations`, `NotificationServiceOperations`,
 * `ProcessLauncherOperations`) through which the session logic talks to the
 * parser, the view layer, persistence, and the host environment.
 */
pub mod config;
pub mod dialogs;
pub mod document;
pub mod launcher;
pub mod models;
pub mod notify;
pub mod parser;
pub mod path_utils;
pub mod recent_files;
pub mod tab_registry;
pub mod tree_builder;
pub mod views;

// Re-export key structures and enums
pub use models::{
    Characteristics, DataDirectory, DirectoryKind, FileHeaderSummary, ImageMagic,
    OptionalHeaderSummary, ViewId,
};

pub use document::DocumentHandle;

pub use parser::{ImageParserOperations, ParsedImageOperations, ParserError, PeliteImageParser};

pub use views::{CoreViewFactory, ViewError, ViewFactoryOperations, ViewInstance};

pub use tree_builder::{NavigationNode, build_navigation_tree, find_view_node};

pub use tab_registry::TabRegistry;

pub use recent_files::{MAX_RECENT_FILES, RecentFilesList};

pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager};

pub use dialogs::{CoreDialogService, DialogServiceOperations};

pub use notify::{CoreNotificationService, NotificationServiceOperations};

pub use launcher::{CoreProcessLauncher, ProcessLauncherOperations};
