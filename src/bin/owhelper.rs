//! owhelper CLI - object event graphics metadata editing for decomp projects
//!
//! This tool lists, inspects, creates, saves and deletes object event
//! entries by rewriting the workspace's C headers and makefile rules.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process;

use owhelper::{CreateParams, EditorError, ObjectEvent, PanelMessage, ProjectConfig, Workspace};

#[derive(Parser)]
#[command(name = "owhelper")]
#[command(version, about = "Object event graphics metadata editor for decomp projects", long_about = None)]
struct Cli {
    /// Workspace root of the decompilation project
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Layout config YAML (defaults to the pokeemerald layout)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List object event definitions with their ids
    List,

    /// Print the editEntry payload for one definition as JSON
    Show {
        /// Definition symbol, e.g. OBJ_EVENT_GFX_BRENDAN_NORMAL
        definition: String,

        /// Skip reading and encoding the referenced image files
        #[arg(long)]
        no_images: bool,
    },

    /// Create a new entry across every dependent file
    Create {
        /// Display name, e.g. "Test Npc"
        name: String,

        /// Sprite size as WIDTHxHEIGHT
        #[arg(short, long, default_value = "32x32")]
        size: String,

        /// Number of overworld frames to generate
        #[arg(short, long, default_value = "9")]
        frames: u32,

        /// Existing palette tag to reuse instead of allocating one
        #[arg(short, long)]
        palette: Option<String>,
    },

    /// Apply a saveEntry message read from a JSON file (or stdin)
    Save {
        /// Path to the message JSON; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Delete an entry's graphics data (the definition id is kept)
    Delete {
        /// Definition symbol to delete
        definition: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match open_workspace(&cli) {
        Ok(workspace) => match cli.command {
            Commands::List => list(&workspace),
            Commands::Show {
                definition,
                no_images,
            } => show(&workspace, &definition, !no_images),
            Commands::Create {
                name,
                size,
                frames,
                palette,
            } => create(&workspace, &name, &size, frames, palette),
            Commands::Save { input } => save(&workspace, input),
            Commands::Delete { definition } => delete(&workspace, &definition),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn open_workspace(cli: &Cli) -> Result<Workspace, EditorError> {
    let config = match &cli.config {
        Some(path) => ProjectConfig::load_from_file(path)?,
        None => ProjectConfig::default(),
    };
    Ok(Workspace::with_config(&cli.root, config))
}

fn list(workspace: &Workspace) -> Result<(), EditorError> {
    let list = owhelper::definitions(workspace)?;
    for event in &list.entries {
        println!("{}\t{}", event.id, event.definition);
    }
    println!("total: {}", list.total);
    Ok(())
}

fn show(workspace: &Workspace, definition: &str, with_images: bool) -> Result<(), EditorError> {
    let list = owhelper::definitions(workspace)?;
    let mut event = list
        .entries
        .into_iter()
        .find(|e| e.definition == definition)
        .unwrap_or_else(|| ObjectEvent::new(definition, ""));
    let message = event.load(workspace, with_images)?;
    println!("{}", message.to_json()?);
    Ok(())
}

fn create(
    workspace: &Workspace,
    name: &str,
    size: &str,
    frames: u32,
    palette: Option<String>,
) -> Result<(), EditorError> {
    let (width, height) = parse_size(size)?;
    let params = CreateParams {
        name: name.to_string(),
        width,
        height,
        frame_count: frames,
        palette_tag: palette,
    };
    let (_, created) = ObjectEvent::create(workspace, &params)?;
    println!(
        "created {} (id {}) using palette tag {}",
        created.definition, created.id, created.palette_tag
    );
    Ok(())
}

fn save(workspace: &Workspace, input: Option<PathBuf>) -> Result<(), EditorError> {
    let json = match input {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| EditorError::Io {
            path: path.display().to_string(),
            source: e,
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| EditorError::Io {
                    path: "<stdin>".to_string(),
                    source: e,
                })?;
            buffer
        }
    };

    match PanelMessage::from_json(&json)? {
        PanelMessage::SaveEntry {
            definition,
            data,
            frames,
        } => {
            let mut event = ObjectEvent::new(definition.as_str(), "");
            event.save(workspace, &data, frames.as_deref())?;
            println!("{} related data has been saved", definition);
            Ok(())
        }
        PanelMessage::DeleteEntry { definition } => {
            let mut event = ObjectEvent::new(definition.as_str(), "");
            event.delete(workspace)?;
            println!(
                "{} related data has been deleted, but the definition is kept",
                definition
            );
            Ok(())
        }
        PanelMessage::EditEntry { .. } => Err(EditorError::Parse(
            "expected a saveEntry or deleteEntry message".to_string(),
        )),
    }
}

fn delete(workspace: &Workspace, definition: &str) -> Result<(), EditorError> {
    let mut event = ObjectEvent::new(definition, "");
    event.delete(workspace)?;
    println!(
        "{} related data has been deleted, but the definition is kept",
        definition
    );
    Ok(())
}

fn parse_size(size: &str) -> Result<(u32, u32), EditorError> {
    let (width, height) = size.split_once('x').ok_or_else(|| {
        EditorError::Parse(format!(
            "size \"{}\" should be WIDTHxHEIGHT, e.g. 32x32",
            size
        ))
    })?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| EditorError::Parse(format!("invalid width in \"{}\"", size)))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| EditorError::Parse(format!("invalid height in \"{}\"", size)))?;
    Ok((width, height))
}
