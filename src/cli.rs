// src/cli.rs
use crate::backend::{FileBackend, KeyValueBackend};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::form::LoginForm;
use crate::models::{CredentialCollection, CredentialRecord};
use crate::query;
use crate::store::RecordStore;
use clap::{Parser, Subcommand};
use log;
use rpassword;
use std::io::{self, Write};
use std::path::PathBuf;

const PASSWORD_MASK: &str = "••••••••";

/// Keep track of the logins you use across services.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the credential store (overrides the config file)
    #[clap(long, global = true, value_parser)]
    pub store_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new login
    Add {
        /// Name of the service the login belongs to
        #[clap(short, long)]
        service: String,
        /// Email or username used on that service
        #[clap(short, long)]
        email: String,
        /// Password; prompted for (hidden) when omitted
        #[clap(short, long)]
        password: Option<String>,
    },
    /// List saved logins, optionally filtered by service name
    List {
        /// Only show services whose name contains this text (case-sensitive)
        #[clap(short = 'q', long)]
        search: Option<String>,
        /// Print passwords in clear
        #[clap(long)]
        show_passwords: bool,
    },
}

pub fn handle_cli_command(cli: Cli, config: &Config) -> AppResult<()> {
    let storage_dir = config.resolve_storage_dir(cli.store_dir)?;
    log::info!("Using credential store in {:?}", storage_dir);
    let store = RecordStore::new(FileBackend::new(storage_dir));

    match cli.command {
        Commands::Add { service, email, password } => {
            log::info!("Executing 'add' command for service {:?}", service);
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ").map_err(|e| {
                    log::error!("Failed to read password: {}", e);
                    AppError::Cli(format!("Failed to read password: {}", e))
                })?,
            };
            let form = LoginForm { service_name: service, email, password };
            let record = register_login(&store, form)?;
            writeln!(io::stdout(), "Saved login for {}.", record.service_name).map_err(output_error)?;
        }
        Commands::List { search, show_passwords } => {
            log::info!("Executing 'list' command (search: {:?})", search);
            let records = store.load_all()?;
            let term = search.unwrap_or_default();
            let shown = query::filter(&records, &term);
            log::info!("Listing {} of {} credential(s)", shown.len(), records.len());
            render_list(&mut io::stdout().lock(), &shown, show_passwords || config.show_passwords).map_err(output_error)?;
        }
    }
    Ok(())
}

/// Validates the form, then stores it under a freshly generated id.
pub fn register_login<B: KeyValueBackend>(store: &RecordStore<B>, form: LoginForm) -> AppResult<CredentialRecord> {
    form.validate().map_err(|e| {
        log::warn!("Rejected new login: {}", e);
        e
    })?;
    let record = store.create(form.service_name, form.email, form.password)?;
    Ok(record)
}

/// "02 in total" for a non-empty list, "Nothing to show" otherwise.
pub fn count_label(count: usize) -> String {
    if count == 0 {
        "Nothing to show".to_string()
    } else {
        format!("{:02} in total", count)
    }
}

pub fn render_list<W: Write>(out: &mut W, records: &CredentialCollection, show_passwords: bool) -> io::Result<()> {
    writeln!(out, "Your passwords ({})", count_label(records.len()))?;
    for record in records {
        let password = if show_passwords { record.password.as_str() } else { PASSWORD_MASK };
        writeln!(out, "  - {}  {}  {}", record.service_name, record.email, password)?;
    }
    Ok(())
}

fn output_error(e: io::Error) -> AppError {
    log::error!("Failed to write to stdout: {}", e);
    AppError::Cli(format!("Failed to write output: {}", e))
}
