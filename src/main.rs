/*
 * CLI entry point. Everything here is a thin surface over `DocumentSession`:
 * argument handling, the interactive command loop, and plain-text rendering
 * of the session state. Each loop command maps 1:1 to a session operation,
 * and commands are gated on the session's enablement table before executing.
 */
mod app_logic;
mod core;

use crate::app_logic::{CommandId, DocumentSession};
use crate::core::{
    CoreConfigManager, CoreDialogService, CoreNotificationService, CoreProcessLauncher,
    CoreViewFactory, NavigationNode, PeliteImageParser, ViewId,
};
use clap::{ArgAction, Parser};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Inspect the structure of PE executable images.
#[derive(Parser)]
#[command(name = "pe_inspect", version)]
struct Cli {
    /// Files to open. The first opens in this instance; any further file is
    /// handed to a separate instance.
    files: Vec<PathBuf>,

    /// Increase log verbosity (repeat for more).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut session = DocumentSession::new(
        Arc::new(PeliteImageParser::new()),
        Box::new(CoreViewFactory::new()),
        Arc::new(CoreDialogService::new()),
        Arc::new(CoreNotificationService::new()),
        Arc::new(CoreProcessLauncher::new()),
        Arc::new(CoreConfigManager::new()),
    );

    if !cli.files.is_empty() {
        session.open_paths(&cli.files);
    }

    run_command_loop(&mut session);
    session.shutdown();
}

fn run_command_loop(session: &mut DocumentSession) {
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("{}> ", session.window_title());
        let _ = std::io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read command: {e}");
                break;
            }
        }

        let input = line.trim();
        let (command, argument) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "open" if !argument.is_empty() => session.open(Path::new(argument), false),
            "open" => execute_gated(session, CommandId::Open),
            "open-new" if !argument.is_empty() => session.open(Path::new(argument), true),
            "open-new" => execute_gated(session, CommandId::OpenNewInstance),
            "close" => execute_gated(session, CommandId::Close),
            "view" => select_view_by_name(session, argument),
            "goto" => select_tree_node(session, argument),
            "tabs" => print_tabs(session),
            "closetab" => close_tab_by_index(session, argument),
            "tree" => print_tree_root(session),
            "show" => print_active_view(session),
            "recent" => handle_recent(session, argument),
            "exit" | "quit" => break,
            unknown => println!("Unknown command '{unknown}'. Type 'help' for a list."),
        }
    }
}

fn execute_gated(session: &mut DocumentSession, command: CommandId) {
    if session.is_enabled(command) {
        session.execute(command);
    } else {
        println!("Command not available right now.");
    }
}

fn select_view_by_name(session: &mut DocumentSession, name: &str) {
    let Some(view_id) = ViewId::parse_cli_name(name) else {
        println!("Unknown view '{name}'.");
        return;
    };
    execute_gated(session, CommandId::for_view(view_id));
}

// The tree-click path: activate the node at `index` under the root.
fn select_tree_node(session: &mut DocumentSession, argument: &str) {
    let Ok(index) = argument.parse::<usize>() else {
        println!("Usage: goto <index>");
        return;
    };
    let view = session
        .tree()
        .and_then(|root| root.children.get(index))
        .and_then(|node| node.view())
        .cloned();
    if view.is_none() {
        println!("No navigation node at index {index}.");
    }
    session.select_view(view);
}

fn close_tab_by_index(session: &mut DocumentSession, argument: &str) {
    let Ok(index) = argument.parse::<usize>() else {
        println!("Usage: closetab <index>");
        return;
    };
    let view = session.tabs().iter().nth(index).cloned();
    match view {
        Some(view) => session.close_view(&view),
        None => println!("No tab at index {index}."),
    }
}

fn print_tabs(session: &DocumentSession) {
    if session.tabs().is_empty() {
        println!("No open tabs.");
        return;
    }
    let selected = session.tabs().selected_view();
    for (index, tab) in session.tabs().iter().enumerate() {
        let marker = if selected.as_ref().is_some_and(|s| Rc::ptr_eq(s, tab)) {
            "*"
        } else {
            " "
        };
        println!("{marker} [{index}] {}", tab.title());
    }
}

fn print_tree_root(session: &DocumentSession) {
    match session.tree() {
        Some(root) => {
            println!("{}", root.label);
            for (index, child) in root.children.iter().enumerate() {
                println!("  [{index}] {}", child.label);
                for grandchild in &child.children {
                    print_tree(grandchild, 2);
                }
            }
        }
        None => println!("No document is open."),
    }
}

fn print_tree(node: &NavigationNode, depth: usize) {
    println!("{}{}", "  ".repeat(depth), node.label);
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

fn print_active_view(session: &DocumentSession) {
    if !session.is_open() {
        println!("No document is open.");
        return;
    }
    match (session.document(), session.tabs().selected_view()) {
        (Some(document), Some(view)) => {
            println!("{}: {}", view.title(), view.describe(document));
        }
        _ => println!("Nothing selected."),
    }
}

fn handle_recent(session: &mut DocumentSession, argument: &str) {
    if argument.is_empty() {
        if session.recent_files().is_empty() {
            println!("No recent files.");
            return;
        }
        for (index, entry) in session.recent_files().entries().iter().enumerate() {
            println!("[{index}] {entry}");
        }
        return;
    }

    let Ok(index) = argument.parse::<usize>() else {
        println!("Usage: recent [index]");
        return;
    };
    match session.recent_files().get(index).map(PathBuf::from) {
        Some(path) => session.open(&path, false),
        None => println!("No recent file at index {index}."),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  open [path]       open a file (prompts when no path is given)");
    println!("  open-new [path]   open a file in a separate instance");
    println!("  close             close the current document");
    println!("  view <name>       activate a view: general, sections, exports,");
    println!("                    imports, resources, debug, loadconfig, dependencies");
    println!("  goto <index>      activate a navigation tree node");
    println!("  tabs              list open tabs");
    println!("  closetab <index>  close a tab");
    println!("  tree              print the navigation tree");
    println!("  show              print the active view");
    println!("  recent [index]    list recent files, or open one");
    println!("  exit              quit");
}

// Shared one-shot logger init for unit tests; `main` configures its own level.
#[cfg(test)]
pub fn initialize_logging() {
    use std::sync::Once;
    static LOGGING_INIT: Once = Once::new();
    LOGGING_INIT.call_once(|| {
        let _ = TermLogger::init(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        );
    });
}
