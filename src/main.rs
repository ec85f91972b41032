//! Notekeep CLI - command-line front-end for the personal notes store

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use notekeep::config::{self, NotekeepConfig};
use notekeep::ui::{self, Icons};
use notekeep::{dispatch, Command, CommandOutput, Credentials, NoteId, NoteStore, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notekeep")]
#[command(version)]
#[command(about = "Personal notes manager - per-user text notes in a local SQLite file")]
#[command(long_about = r#"
Notekeep keeps your notes in a single SQLite database file:
  • Sign up and log in with a username and password
  • Add, list, show, edit and delete notes
  • Back a note up to a text file before deleting it

Example usage:
  notekeep signup -u alice -p secret
  notekeep add -u alice -p secret --title "Groceries" --content "milk, eggs"
  notekeep list -u alice -p secret
  notekeep delete 1 --backup
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Path to the diagnostic log file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Directory that note backups are written to
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct CredentialArgs {
    /// Account name (case-insensitive)
    #[arg(short, long)]
    username: String,

    /// Account password
    #[arg(short, long, env = "NOTEKEEP_PASSWORD", hide_env_values = true)]
    password: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(args.username, args.password)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its tables
    Init,

    /// Create an account
    Signup {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Check a username and password
    Login {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Add a note
    Add {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Note title
        #[arg(short, long)]
        title: String,

        /// Note body
        #[arg(short, long)]
        content: String,
    },

    /// List your notes
    List {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Show one note
    Show {
        /// Note id
        id: NoteId,
    },

    /// Replace a note's title and content
    Edit {
        /// Note id
        id: NoteId,

        /// New title
        #[arg(short, long)]
        title: String,

        /// New body
        #[arg(short, long)]
        content: String,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: NoteId,

        /// Write backup_note_<id>.txt first
        #[arg(long)]
        backup: bool,
    },

    /// Write a note to backup_note_<id>.txt
    Export {
        /// Note id
        id: NoteId,
    },

    /// Show statistics about the database
    Stats,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the effective settings to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let file_config = config::load_config(Some(&config_path))
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let overrides = NotekeepConfig {
        database: cli.database.as_ref().map(|p| p.display().to_string()),
        log_file: cli.log_file.as_ref().map(|p| p.display().to_string()),
        backup_dir: cli.backup_dir.as_ref().map(|p| p.display().to_string()),
    };
    let store_config = StoreConfig::resolve(file_config.as_ref(), &overrides);

    notekeep::logging::init(&store_config.log_file, cli.verbose)?;

    let command = match cli.command {
        Commands::Config { action: ConfigAction::Init { force } } => {
            config::write_config(&config_path, &NotekeepConfig::from(&store_config), force)?;
            ui::success(&format!("Wrote config to {}", config_path.display()));
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Init => None,
        Commands::Signup { credentials } => Some(Command::Signup(credentials.into())),
        Commands::Login { credentials } => Some(Command::Login(credentials.into())),
        Commands::Add { credentials, title, content } => Some(Command::AddNote {
            credentials: credentials.into(),
            title,
            content,
        }),
        Commands::List { credentials } => Some(Command::ListNotes(credentials.into())),
        Commands::Show { id } => Some(Command::ShowNote(id)),
        Commands::Edit { id, title, content } => Some(Command::UpdateNote {
            note_id: id,
            title,
            content,
        }),
        Commands::Delete { id, backup } => Some(Command::DeleteNote { note_id: id, backup }),
        Commands::Export { id } => Some(Command::ExportNote(id)),
        Commands::Stats => Some(Command::Stats),
    };

    tracing::debug!("Using database {}", store_config.database.display());
    let store = NoteStore::open(&store_config)
        .with_context(|| format!("failed to open database {}", store_config.database.display()))?;

    let Some(command) = command else {
        ui::success(&format!("Database ready at {}", store_config.database.display()));
        return Ok(ExitCode::SUCCESS);
    };

    let output = dispatch(&store, command)?;
    tracing::debug!("Command finished: {}", output.kind());
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => render(&output, &store_config),
    }

    Ok(if output.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render(output: &CommandOutput, config: &StoreConfig) {
    match output {
        CommandOutput::SignedUp { .. } => ui::success("Signup successful. You can now log in."),
        CommandOutput::UsernameTaken => ui::error("Username already exists. Please try another."),
        CommandOutput::LoggedIn { user_id } => {
            ui::success("Login successful.");
            ui::info("user id", &user_id.to_string());
        }
        CommandOutput::InvalidCredentials => ui::error("Invalid credentials. Please try again."),
        CommandOutput::NoteCreated { note_id } => {
            ui::success(&format!("Note {} added.", note_id));
        }
        CommandOutput::Notes { notes } => {
            if notes.is_empty() {
                println!("{} No notes available.", Icons::EMPTY);
            } else {
                ui::header(Icons::NOTE, &format!("{} note(s)", notes.len()));
                println!("{}", ui::notes_table(notes));
            }
        }
        CommandOutput::Note { note } => ui::note_detail(note),
        CommandOutput::NoteUpdated { note_id } => {
            ui::success(&format!("Note {} saved.", note_id));
        }
        CommandOutput::NoteDeleted { note_id, backup } => {
            if let Some(path) = backup {
                ui::info("backup", &path.display().to_string());
            }
            ui::success(&format!("Note {} deleted.", note_id));
        }
        CommandOutput::NoteExported { path, .. } => {
            ui::success(&format!("Note backed up to file: {}", path.display()));
        }
        CommandOutput::NoteNotFound { note_id } => {
            ui::warn(&format!("Note {} not found.", note_id));
        }
        CommandOutput::Stats { stats } => {
            ui::header(Icons::STATS, &format!("Notekeep Statistics ({})", config.database.display()));
            let users = stats.users.to_string();
            let notes = stats.notes.to_string();
            println!("{}", ui::stats_table(&[("Users", &users), ("Notes", &notes)]));
        }
    }
}
