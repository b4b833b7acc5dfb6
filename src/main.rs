//! toc-ideator: draft a table of contents with candidate titles per heading.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use toc_ideator::config::Config;
use toc_ideator::drag::{DropSite, MoveMode, RowHalf};
use toc_ideator::node::NodeId;
use toc_ideator::numbering::render_preview;
use toc_ideator::persist::FilePersister;
use toc_ideator::render::render_tree;
use toc_ideator::session::{PendingImport, Session};
use toc_ideator::store::SnapshotStore;
use toc_ideator::{Error, Result};
use tracing::debug;

#[derive(Parser)]
#[command(name = "toc-ideator")]
#[command(about = "Draft a table of contents with candidate titles per heading", long_about = None)]
struct Args {
    /// Saved outline to work on
    #[arg(long, short = 'f', value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    /// Directory holding published snapshots
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start over with a single default chapter
    Init,
    /// Show the editable tree with ids
    Tree,
    /// Show the numbered preview
    Preview {
        /// Hide the dotted numbers
        #[arg(long)]
        plain: bool,
    },
    /// Print the outline as Markdown headings
    Markdown,
    /// Export a JSON snapshot
    Export {
        /// Write to this file, or into this directory under a timestamped name
        #[arg(long, short = 'o', value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Replace the outline with a JSON snapshot or the headings of a Markdown file
    Import {
        /// File to import; `.md` files are read as Markdown
        path: PathBuf,
        /// Replace without asking
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Set the document title, creating it if absent
    Title {
        /// Title text
        text: String,
    },
    /// Append a chapter at the end
    AddSection,
    /// Insert a sibling after a section
    AddSibling {
        /// Section id
        id: String,
    },
    /// Append a child to a section
    AddChild {
        /// Section id
        id: String,
    },
    /// Delete a node and everything below it
    Delete {
        /// Node id
        id: String,
    },
    /// Choose which candidate title is displayed
    Select {
        /// Node id
        id: String,
        /// Candidate index, counted from 0
        index: usize,
    },
    /// Edit the candidate titles of a node
    Option {
        #[command(subcommand)]
        action: OptionAction,
    },
    /// Collapse or expand a section in the tree view
    Toggle {
        /// Section id
        id: String,
    },
    /// Drag a section to a new place
    Move {
        /// Section to move
        source: String,
        /// Where to drop it relative to the target
        #[arg(value_enum)]
        place: Place,
        /// Target section; not needed for `end`
        target: Option<String>,
    },
    /// Publish a read-only snapshot and print its share link
    Publish,
    /// Show a published snapshot
    View {
        /// Share id
        id: String,
        /// Hide the dotted numbers
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand)]
enum OptionAction {
    /// Add a candidate title
    Add {
        /// Node id
        id: String,
        /// Candidate text
        text: String,
    },
    /// Overwrite a candidate title
    Edit {
        /// Node id
        id: String,
        /// Candidate index, counted from 0
        index: usize,
        /// New text
        text: String,
    },
    /// Remove a candidate title
    Remove {
        /// Node id
        id: String,
        /// Candidate index, counted from 0
        index: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Place {
    /// Before the target, at the same level
    Before,
    /// After the target, at the same level
    After,
    /// As the last child of the target
    Into,
    /// At the end of the chapter list
    End,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::too_many_lines)]
fn run(args: Args) -> Result<()> {
    let cfg = Config::load();
    let outline_path = args.file.unwrap_or_else(|| PathBuf::from(&cfg.outline_path));
    let store_dir = args.store.unwrap_or_else(|| PathBuf::from(&cfg.store_dir));

    let mut persister = FilePersister::new(outline_path);
    let mut session = Session::restore(&persister);
    session.show_numbers = cfg.show_numbers;

    let changed = match args.command {
        Command::Init => {
            session.reset();
            true
        }
        Command::Tree => {
            println!("{}", render_tree(&session.outline));
            false
        }
        Command::Preview { plain } => {
            session.show_numbers &= !plain;
            println!("{}", session.preview(cfg.indent_width));
            false
        }
        Command::Markdown => {
            println!("{}", session.markdown());
            false
        }
        Command::Export { out } => {
            export(&session, out.as_deref())?;
            false
        }
        Command::Import { path, yes } => import(&mut session, &path, yes)?,
        Command::Title { text } => {
            let set = session.outline.set_title(&text).is_some();
            if !set {
                session.message = Some("The title cannot be blank".to_string());
            }
            set
        }
        Command::AddSection => {
            let id = session.outline.add_section();
            println!("{id}");
            true
        }
        Command::AddSibling { id } => {
            let new = require(session.outline.add_sibling(&NodeId::from(id.as_str())), &id)?;
            println!("{new}");
            true
        }
        Command::AddChild { id } => {
            let new = require(session.outline.add_child(&NodeId::from(id.as_str())), &id)?;
            println!("{new}");
            true
        }
        Command::Delete { id } => check(session.outline.delete(&NodeId::from(id.as_str())), &id)?,
        Command::Select { id, index } => check(
            session.outline.set_selected(&NodeId::from(id.as_str()), index),
            &id,
        )?,
        Command::Option { action } => edit_options(&mut session, action)?,
        Command::Toggle { id } => check(
            session.outline.toggle_collapsed(&NodeId::from(id.as_str())),
            &id,
        )?,
        Command::Move {
            source,
            place,
            target,
        } => drag(&mut session, &source, place, target.as_deref())?,
        Command::Publish => {
            let store = SnapshotStore::new(&store_dir, cfg.share_prefix.as_str());
            let published = session.publish(&store)?;
            println!("{}", published.url);
            false
        }
        Command::View { id, plain } => {
            let store = SnapshotStore::new(&store_dir, cfg.share_prefix.as_str());
            let view = store.fetch(&id)?;
            if !view.timestamp.is_empty() {
                println!("Shared snapshot, {}", view.timestamp);
            }
            println!(
                "{}",
                render_preview(&view.rows, cfg.show_numbers && !plain, cfg.indent_width)
            );
            false
        }
    };

    if changed {
        session.autosave(&mut persister);
        println!("{}", render_tree(&session.outline));
    }
    if let Some(message) = &session.message {
        eprintln!("{message}");
    }
    Ok(())
}

fn require(created: Option<NodeId>, id: &str) -> Result<NodeId> {
    created.ok_or_else(|| Error::UnknownNode(id.to_string()))
}

fn check(applied: bool, id: &str) -> Result<bool> {
    if applied {
        Ok(true)
    } else {
        Err(Error::UnknownNode(id.to_string()))
    }
}

fn edit_options(session: &mut Session, action: OptionAction) -> Result<bool> {
    let outline = &mut session.outline;
    match action {
        OptionAction::Add { id, text } => {
            check(outline.add_option(&NodeId::from(id.as_str()), &text), &id)
        }
        OptionAction::Edit { id, index, text } => check(
            outline.edit_option(&NodeId::from(id.as_str()), index, &text),
            &id,
        ),
        OptionAction::Remove { id, index } => check(
            outline.remove_option(&NodeId::from(id.as_str()), index),
            &id,
        ),
    }
}

/// Replays a pointer drag: pick up `source`, hover the target row or the canvas, release.
fn drag(session: &mut Session, source: &str, place: Place, target: Option<&str>) -> Result<bool> {
    let source_id = NodeId::from(source);
    if !session.drag.start(&session.outline, &source_id) {
        return Err(Error::UnknownNode(source.to_string()));
    }

    let site = match (place, target) {
        (Place::End, _) => {
            session.drag.hover_canvas();
            DropSite::Canvas
        }
        (_, Some(target)) => {
            let target_id = NodeId::from(target);
            let half = match place {
                Place::Before => RowHalf::Upper,
                _ => RowHalf::Lower,
            };
            let wanted = match place {
                Place::Before => MoveMode::Before,
                Place::After => MoveMode::After,
                _ => MoveMode::Into,
            };
            let offered = session.drag.hover_row(&session.outline, &target_id, half);
            debug!(?offered, "hovered target row");
            if offered != Some(wanted) {
                session.drag.leave_row(&target_id);
            }
            DropSite::Row(target_id)
        }
        (_, None) => {
            session.drag.cancel();
            session.message = Some("A target section is required".to_string());
            return Ok(false);
        }
    };

    if session.drag.drop_at(&mut session.outline, &site) {
        Ok(true)
    } else {
        session.message = Some("That move is not allowed".to_string());
        Ok(false)
    }
}

fn export(session: &Session, out: Option<&Path>) -> Result<()> {
    let snapshot = session.snapshot();
    let json = snapshot.to_json()?;
    match out {
        None => println!("{json}"),
        Some(dir) if dir.is_dir() => {
            let path = dir.join(snapshot.file_name());
            std::fs::write(&path, json)?;
            eprintln!("Wrote {}", path.display());
        }
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn import(session: &mut Session, path: &Path, yes: bool) -> Result<bool> {
    let text = std::fs::read_to_string(path)?;
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"));
    let pending = if is_markdown {
        Session::stage_markdown(&text)?
    } else {
        Session::stage_import_text(&text)?
    };

    if !yes && !confirm(session, &pending)? {
        session.message = Some("Import cancelled".to_string());
        return Ok(false);
    }
    session.confirm_import(pending);
    Ok(true)
}

fn confirm(session: &Session, pending: &PendingImport) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "Replace the current outline ({} nodes) with the imported one ({} nodes)? [y/N] ",
        session.outline.len(),
        pending.outline().len()
    )?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
