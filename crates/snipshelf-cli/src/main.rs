use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use snipshelf_core::keys;
use snipshelf_core::models::snippet::{SnippetDraft, SnippetId};
use snipshelf_search::query::Query;
use snipshelf_search::sort::SortKey;

use snipshelf_cli::commands::{self, Command, SnippetEdit};
use snipshelf_cli::config::{self, SnipshelfConfig};
use snipshelf_cli::render;
use snipshelf_cli::state::AppState;

#[derive(Parser)]
#[command(name = "snipshelf", version, about = "Keep, tag and search code snippets")]
struct Cli {
    /// Config file (default: <config dir>/snipshelf/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the directory the snippets are stored in
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Save a new snippet
    Add {
        #[arg(long)]
        title: String,
        /// Snippet body, or `-` to read it from stdin
        #[arg(long)]
        code: String,
        #[arg(long, default_value = "")]
        language: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Change fields of a snippet; omitted fields stay as they are
    Edit {
        id: SnippetId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a snippet
    Delete {
        id: SnippetId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Star or unstar a snippet
    Favorite { id: SnippetId },
    /// Print a snippet's code
    Show { id: SnippetId },
    /// List snippets, filtered and sorted
    List {
        #[arg(long, short, default_value = "")]
        search: String,
        #[arg(long, short)]
        language: Option<String>,
        #[arg(long, short)]
        favorites: bool,
        /// newest, oldest, title, title-desc or favorites
        #[arg(long)]
        sort: Option<SortKey>,
    },
    /// Write all snippets to a JSON file
    Export {
        /// Defaults to snippets-<date>.json in the current directory
        path: Option<PathBuf>,
    },
    /// Merge snippets from a JSON file exported earlier
    Import { path: PathBuf },
    /// List the languages in use
    Languages,
    /// Show the config, or change it
    Config {
        #[arg(long)]
        default_sort: Option<SortKey>,
        #[arg(long)]
        confirm_delete: Option<bool>,
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let loaded = config::read_config(&config_path)?;
    let mut config = loaded.config;

    let fallback_filter = config.log_filter.as_deref().unwrap_or("warn");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(from) = loaded.migrated_from {
        tracing::info!(path = %config_path.display(), from, to = config.config_version, "config migrated");
    }

    let cmd = match cli.command {
        Cmd::Config {
            default_sort,
            confirm_delete,
            store_dir,
        } => {
            return configure(
                &config_path,
                config,
                cli.data_dir.as_deref(),
                default_sort,
                confirm_delete,
                store_dir,
            );
        }
        other => other,
    };

    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let mut state = AppState::open(config)?;

    let Some(command) = to_command(cmd, &state)? else {
        return Ok(());
    };

    let outcome = commands::execute(&mut state.repo, command)?;
    println!("{}", render::render(&outcome));
    Ok(())
}

/// Translate parsed arguments into a command. `None` means the user backed out.
fn to_command(cmd: Cmd, state: &AppState) -> Result<Option<Command>> {
    let command = match cmd {
        Cmd::Add {
            title,
            code,
            language,
            tags,
        } => Command::Add(SnippetDraft::new(title, language, read_code(code)?, tags)),
        Cmd::Edit {
            id,
            title,
            code,
            language,
            tags,
        } => Command::Edit {
            id,
            changes: SnippetEdit {
                title,
                language,
                code: code.map(read_code).transpose()?,
                tags_text: tags,
            },
        },
        Cmd::Delete { id, yes } => {
            let needs_prompt = !yes && state.config.confirm_delete;
            if let Some(snippet) = state.repo.get(id) {
                if needs_prompt && !confirm(&format!("Delete \"{}\"?", snippet.title))? {
                    println!("Cancelled");
                    return Ok(None);
                }
            }
            Command::Delete { id }
        }
        Cmd::Favorite { id } => Command::ToggleFavorite { id },
        Cmd::Show { id } => Command::Show { id },
        Cmd::List {
            search,
            language,
            favorites,
            sort,
        } => Command::List(Query {
            search,
            language,
            favorites_only: favorites,
            sort: sort.unwrap_or(state.config.default_sort),
        }),
        Cmd::Export { path } => Command::Export {
            path: path.unwrap_or_else(|| {
                PathBuf::from(keys::export_file_name(jiff::Timestamp::now()))
            }),
        },
        Cmd::Import { path } => Command::Import { path },
        Cmd::Languages => Command::Languages,
        Cmd::Config { .. } => return Ok(None),
    };
    Ok(Some(command))
}

fn configure(
    path: &std::path::Path,
    mut config: SnipshelfConfig,
    data_dir_override: Option<&std::path::Path>,
    default_sort: Option<SortKey>,
    confirm_delete: Option<bool>,
    store_dir: Option<PathBuf>,
) -> Result<()> {
    let changed = default_sort.is_some() || confirm_delete.is_some() || store_dir.is_some();
    if let Some(sort) = default_sort {
        config.default_sort = sort;
    }
    if let Some(confirm) = confirm_delete {
        config.confirm_delete = confirm;
    }
    if let Some(dir) = store_dir {
        config.data_dir = Some(dir);
    }
    if changed {
        config::save_config(path, &config)?;
    }

    println!("config: {}", path.display());
    println!(
        "data_dir: {}",
        config.effective_data_dir(data_dir_override)?.display()
    );
    println!("default_sort: {}", config.default_sort);
    println!("confirm_delete: {}", config.confirm_delete);
    Ok(())
}

/// `-` reads the code from stdin.
fn read_code(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut code = String::new();
    std::io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
