//! Developer CLI over the student store.
//!
//! Drives the same `StudentStore` the mobile host uses, against a local file.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rollbook_core::{
    init_logging, seed_sample_records, LogNotificationSink, StoreConfig, StoreLocation, Student,
    StudentDraft, StudentStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollbook", version, about = "Local student records")]
struct Cli {
    /// Database file; overrides ROLLBOOK_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Insert the ten sample students.
    Seed,
    /// Add a student.
    Add(StudentArgs),
    /// Rewrite every field of a student.
    Edit {
        id: i64,
        #[command(flatten)]
        student: StudentArgs,
    },
    /// Delete a student.
    Remove { id: i64 },
    /// Show one student.
    Show { id: i64 },
    /// List students whose name contains QUERY (all when omitted).
    List { query: Option<String> },
}

#[derive(Args)]
struct StudentArgs {
    #[arg(long)]
    name: String,
    /// yyyy-MM-dd
    #[arg(long)]
    birth_date: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<StudentArgs> for StudentDraft {
    fn from(value: StudentArgs) -> Self {
        StudentDraft::new(
            value.name,
            value.birth_date,
            value.email,
            value.phone,
            value.notes,
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = StoreConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    if let Command::Ping = cli.command {
        println!("rollbook_core ping={}", rollbook_core::ping());
        println!("rollbook_core version={}", rollbook_core::core_version());
        return Ok(());
    }

    let db_path = cli.db.unwrap_or(config.db_path);
    let mut store = StudentStore::new();
    store
        .open(StoreLocation::File(db_path.clone()))
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    let outcome = run(&store, cli.command);
    store.close();
    outcome
}

fn run(store: &StudentStore, command: Command) -> Result<()> {
    match command {
        Command::Ping => {}
        Command::Seed => {
            let report = seed_sample_records(store, &LogNotificationSink);
            println!(
                "inserted={} failed={}",
                report.inserted.len(),
                report.failed
            );
            if !report.is_complete() {
                bail!("failed to create sample records");
            }
        }
        Command::Add(args) => {
            let id = store.insert(&args.into())?;
            println!("{id}");
        }
        Command::Edit { id, student } => {
            if !store.update(id, &student.into())? {
                bail!("student {id} not found");
            }
        }
        Command::Remove { id } => {
            if !store.delete(id)? {
                bail!("student {id} not found");
            }
        }
        Command::Show { id } => match store.get(id)? {
            Some(student) => print_student(&student),
            None => bail!("student {id} not found"),
        },
        Command::List { query } => {
            for student in store.search(query.as_deref().unwrap_or(""))? {
                print_student(&student);
            }
        }
    }
    Ok(())
}

fn print_student(student: &Student) {
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        student.id, student.name, student.birth_date, student.email, student.phone, student.notes
    );
}
