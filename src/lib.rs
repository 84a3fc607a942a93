//! Shelf: a local-first product catalog manager.
//!
//! Shelf keeps a catalog of priced items in a durable SQLite store and
//! exposes transactional CRUD, paginated listing, and case-insensitive
//! substring search over it.
//!
//! # Architecture
//!
//! The crate is split along the seams a request travels through:
//!
//! - **CLI boundary** (this module): argument parsing, request validation,
//!   output rendering, and translation of core failures into exit codes.
//!   Nothing below this layer prints or logs.
//! - **Catalog service** ([`catalog::service`]): the only component that
//!   composes store calls with business rules. Stateless across calls;
//!   every mutating operation runs its load-mutate-persist sequence inside
//!   a single transaction.
//! - **Mapper** ([`catalog::mapper`]): pure translation between request
//!   shapes, the stored entity, and the read-side view, including the
//!   null-ignoring partial merge used by `update`.
//! - **Item store** ([`catalog::store`]): conn-scoped SQLite access:
//!   insert with store-assigned ids, point lookup, upsert, delete,
//!   paginated scan, and substring search.
//! - **The broker** ([`core::broker`]): every store touch goes through
//!   `DbBroker::with_conn`, which serializes in-process access and records
//!   an audit event per operation in `broker.events.jsonl`.
//!
//! All state lives under `<root>/.shelf/data/`. The store root is found by
//! walking up from the working directory, like a VCS root.
//!
//! # Examples
//!
//! ```bash
//! # Initialize a catalog store
//! shelf init
//!
//! # Add an item
//! shelf add --name "Coffee Mug" --price 12.99
//!
//! # Page through the catalog, newest ids first
//! shelf list --page 0 --size 20 --sort id,desc
//!
//! # Case-insensitive substring search
//! shelf search mug
//!
//! # Partial update: only the price changes
//! shelf update --id 1 --price 14.50
//!
//! # Full replace and delete
//! shelf replace --id 1 --name "Travel Mug" --price 19.99
//! shelf rm --id 1
//! ```

pub mod catalog;
pub mod core;

use crate::catalog::item::{self, ItemPatch, ItemRequest, ItemView};
use crate::catalog::mapper;
use crate::catalog::service::CatalogService;
use crate::core::broker::now_epoch_z;
use crate::core::config;
use crate::core::db;
use crate::core::error::ShelfError;
use crate::core::page::{self, Page, PageRequest, SortDirection, SortKey};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "shelf",
    version = env!("CARGO_PKG_VERSION"),
    about = "Shelf is the local-first product catalog manager: transactional CRUD, paginated listing, and case-insensitive search over a durable SQLite store. 🦀"
)]
struct Cli {
    /// Output format for command results.
    #[clap(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Store root directory (defaults to the nearest ancestor containing .shelf/).
    #[clap(long, global = true)]
    dir: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Page index, 0-based.
    #[clap(long, default_value_t = 0)]
    page: u32,
    /// Page size (> 0). Falls back to config, then 20.
    #[clap(long)]
    size: Option<u32>,
    /// Sort spec: id|name|price with optional direction, e.g. "id,desc".
    #[clap(long)]
    sort: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a catalog store in the target directory.
    Init,
    /// Add a new item to the catalog.
    Add {
        #[clap(long)]
        name: String,
        #[clap(long)]
        price: Decimal,
    },
    /// List items, paged and sorted.
    List {
        #[clap(flatten)]
        page: PageArgs,
    },
    /// Search items by case-insensitive name substring.
    Search {
        /// Substring to match within item names.
        #[clap(value_name = "QUERY")]
        query: String,
        #[clap(flatten)]
        page: PageArgs,
    },
    /// Show a single item by id.
    Get {
        #[clap(long)]
        id: i64,
    },
    /// Apply a partial update: only supplied fields change.
    Update {
        #[clap(long)]
        id: i64,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        price: Option<Decimal>,
    },
    /// Replace an item's name and price wholesale.
    Replace {
        #[clap(long)]
        id: i64,
        #[clap(long)]
        name: String,
        #[clap(long)]
        price: Decimal,
    },
    /// Delete an item by id.
    Rm {
        #[clap(long)]
        id: i64,
    },
    /// Print the shelf version.
    Version,
}

/// Walk up from `start` looking for an initialized store root.
fn find_catalog_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(path) = current {
        if path.join(".shelf").join("data").exists() {
            return Some(path.to_path_buf());
        }
        current = path.parent();
    }
    None
}

fn resolve_root(dir: &Option<PathBuf>) -> Result<PathBuf, ShelfError> {
    if let Some(d) = dir {
        return std::fs::canonicalize(d).map_err(ShelfError::IoError);
    }
    let cwd = std::env::current_dir()?;
    find_catalog_root(&cwd).ok_or_else(|| {
        ShelfError::ValidationError(
            "no catalog store found in this directory or any parent; run `shelf init` first"
                .to_string(),
        )
    })
}

/// Merge CLI paging flags with configured defaults into a `PageRequest`.
fn page_request(root: &Path, args: &PageArgs) -> Result<PageRequest, ShelfError> {
    let config = config::load_config(root)?;
    let size = args
        .size
        .or(config.page_size)
        .unwrap_or(page::DEFAULT_PAGE_SIZE);
    let (sort, direction) = match args.sort.as_deref().or(config.sort.as_deref()) {
        Some(spec) => page::parse_sort(spec)?,
        None => (SortKey::Id, SortDirection::Desc),
    };
    PageRequest::new(args.page, size, sort, direction)
}

fn print_item(view: &ItemView) {
    println!(
        "{:>6}  {:<40}  {:>14}",
        view.id.to_string().bold(),
        view.name,
        view.price.to_string().green()
    );
}

fn print_page(page: &Page<ItemView>) {
    println!(
        "{:>6}  {:<40}  {:>14}",
        "id".dimmed(),
        "name".dimmed(),
        "price".dimmed()
    );
    for view in &page.items {
        print_item(view);
    }
    println!(
        "{}",
        format!(
            "page {} of {} ({} items total)",
            page.page, page.total_pages, page.total_items
        )
        .dimmed()
    );
}

fn emit_item(cmd: &str, view: &ItemView, format: OutputFormat) {
    match format {
        OutputFormat::Text => print_item(view),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "ts": now_epoch_z(),
                "cmd": cmd,
                "status": "ok",
                "item": view,
            });
            println!("{}", out);
        }
    }
}

fn emit_page(cmd: &str, page: &Page<ItemView>, format: OutputFormat) {
    match format {
        OutputFormat::Text => print_page(page),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "ts": now_epoch_z(),
                "cmd": cmd,
                "status": "ok",
                "page": page,
            });
            println!("{}", out);
        }
    }
}

pub fn run() -> Result<(), ShelfError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Init => {
            let target = match &cli.dir {
                Some(d) => {
                    std::fs::create_dir_all(d).map_err(ShelfError::IoError)?;
                    std::fs::canonicalize(d).map_err(ShelfError::IoError)?
                }
                None => std::env::current_dir()?,
            };
            let db_path = db::initialize_catalog_db(&target)?;
            match cli.format {
                OutputFormat::Text => {
                    println!(
                        "Catalog store initialized at {}",
                        db_path.display().to_string().bold()
                    );
                }
                OutputFormat::Json => {
                    let out = serde_json::json!({
                        "ts": now_epoch_z(),
                        "cmd": "catalog.init",
                        "status": "ok",
                        "db_path": db_path.to_string_lossy(),
                    });
                    println!("{}", out);
                }
            }
            Ok(())
        }
        Command::Add { ref name, price } => {
            let root = resolve_root(&cli.dir)?;
            let request = ItemRequest {
                name: name.clone(),
                price,
            };
            item::validate_request(&request)?;
            let service = CatalogService::new(&root);
            let created = service.create(&mapper::to_item(&request))?;
            emit_item("catalog.add", &mapper::to_view(&created), cli.format);
            Ok(())
        }
        Command::List { ref page } => {
            let root = resolve_root(&cli.dir)?;
            let request = page_request(&root, page)?;
            let service = CatalogService::new(&root);
            let result = service.list(&request)?.map(|i| mapper::to_view(&i));
            emit_page("catalog.list", &result, cli.format);
            Ok(())
        }
        Command::Search {
            ref query,
            ref page,
        } => {
            let root = resolve_root(&cli.dir)?;
            let request = page_request(&root, page)?;
            let service = CatalogService::new(&root);
            let result = service.search(query, &request)?.map(|i| mapper::to_view(&i));
            emit_page("catalog.search", &result, cli.format);
            Ok(())
        }
        Command::Get { id } => {
            let root = resolve_root(&cli.dir)?;
            let service = CatalogService::new(&root);
            let found = service.get_or_fail(id)?;
            emit_item("catalog.get", &mapper::to_view(&found), cli.format);
            Ok(())
        }
        Command::Update {
            id,
            ref name,
            price,
        } => {
            let root = resolve_root(&cli.dir)?;
            let patch = ItemPatch {
                name: name.clone(),
                price,
            };
            item::validate_patch(&patch)?;
            let service = CatalogService::new(&root);
            let updated = service.update(id, &patch)?;
            emit_item("catalog.update", &mapper::to_view(&updated), cli.format);
            Ok(())
        }
        Command::Replace {
            id,
            ref name,
            price,
        } => {
            let root = resolve_root(&cli.dir)?;
            let request = ItemRequest {
                name: name.clone(),
                price,
            };
            item::validate_request(&request)?;
            let service = CatalogService::new(&root);
            let replaced = service.replace(id, &request)?;
            emit_item("catalog.replace", &mapper::to_view(&replaced), cli.format);
            Ok(())
        }
        Command::Rm { id } => {
            let root = resolve_root(&cli.dir)?;
            let service = CatalogService::new(&root);
            service.delete(id)?;
            match cli.format {
                OutputFormat::Text => {
                    println!("Deleted item {}", id.to_string().bold());
                }
                OutputFormat::Json => {
                    let out = serde_json::json!({
                        "ts": now_epoch_z(),
                        "cmd": "catalog.rm",
                        "status": "ok",
                        "id": id,
                    });
                    println!("{}", out);
                }
            }
            Ok(())
        }
    }
}

/// Map a failure kind to a process exit code: validation errors are
/// caller mistakes (2), missing items are their own class (4), storage
/// and I/O failures are fatal (1).
pub fn error_exit_code(err: &ShelfError) -> i32 {
    match err {
        ShelfError::ValidationError(_) => 2,
        ShelfError::NotFound(_) => 4,
        _ => 1,
    }
}

pub fn report_error(err: &ShelfError) {
    eprintln!("{} {}", "error:".red().bold(), err);
}
