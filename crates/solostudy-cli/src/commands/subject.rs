use std::path::PathBuf;

use clap::Subcommand;
use solostudy_core::import::Importer;
use solostudy_core::Priority;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add {
        /// Subject name, e.g. "MTH101: Elementary Math I"
        name: String,
        /// high, medium or low
        #[arg(long, short, default_value = "medium")]
        priority: Priority,
    },
    /// List subjects as JSON
    List,
    /// Remove a subject by ID
    Remove {
        /// Subject ID
        id: String,
    },
    /// Import course codes from a document, or restore a .json backup
    Import {
        /// File to read; the extension picks the decoder
        path: PathBuf,
    },
    /// Replace all subjects with a .json backup
    Restore {
        /// Backup file
        path: PathBuf,
    },
    /// Write a backup of all subjects
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: SubjectAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        SubjectAction::Add { name, priority } => {
            let Some(subject) = session.state.add_subject(&name, priority) else {
                return Err("subject name must not be empty".into());
            };
            print_json(subject)?;
        }
        SubjectAction::List => {
            print_json(session.state.subjects())?;
            return Ok(());
        }
        SubjectAction::Remove { id } => {
            if !session.state.remove_subject(&id) {
                return Err(format!("no subject with id {id}").into());
            }
            println!("removed {id}");
        }
        SubjectAction::Import { path } => {
            let payload = Importer::new().read(&path)?;
            let event = session.state.apply_import(payload)?;
            print_json(&event)?;
        }
        SubjectAction::Restore { path } => {
            let bytes = std::fs::read(&path)?;
            let payload = Importer::new().route("json", &bytes)?;
            let event = session.state.apply_import(payload)?;
            print_json(&event)?;
        }
        SubjectAction::Export { output } => {
            let backup = session.state.export_backup()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, backup)?;
                    eprintln!("backup written to {}", path.display());
                }
                None => println!("{backup}"),
            }
            return Ok(());
        }
    }

    session.save()?;
    Ok(())
}
