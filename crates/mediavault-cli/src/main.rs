//! Mediavault CLI — command-line admin console for the media-vault backend.
//!
//! Set MEDIAVAULT_API_URL (or API_URL). Credentials are persisted under the
//! user config directory after `login`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use mediavault_api_client::{ApiClient, ClientUploader};
use mediavault_cli::{init_tracing, parse_meta_arg};
use mediavault_core::models::{
    FileSource, PageParams, SortOrder, UploadBatch, UploadItem,
};
use mediavault_core::validation::validate_upload_items;
use mediavault_upload::{EngineConfig, UploadEngine, UploadEvent};

#[derive(Parser)]
#[command(name = "mediavault", about = "Mediavault admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        username: String,
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the current session user
    Whoami,
    /// Upload one or more files as a batch
    Upload {
        /// Paths of the files to upload
        files: Vec<PathBuf>,
        /// Display names, matched to files by position
        #[arg(long)]
        name: Vec<String>,
        /// Metadata entries applied to every file: name=type:value
        /// (type: url, text-input, free-text, number)
        #[arg(long)]
        meta: Vec<String>,
        /// Storage provider id (see `providers`)
        #[arg(long)]
        provider: i64,
        /// Optional category uid
        #[arg(long)]
        category: Option<String>,
        /// Maximum concurrent transfers (streaming mode)
        #[arg(long)]
        limit: Option<usize>,
        /// Transfer files individually through the upload engine instead of
        /// one batched request
        #[arg(long)]
        streaming: bool,
    },
    /// List selectable storage providers
    Providers,
    /// List files
    Files {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
    },
    /// List categories
    Categories {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
        #[arg(long)]
        sort_by: Option<String>,
        /// asc or desc
        #[arg(long)]
        order: Option<String>,
    },
    /// List users (admin only)
    Users {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long)]
        order: Option<String>,
    },
    /// Show dashboard counters
    Stats,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn page_params(
    page: u32,
    page_size: u32,
    sort_by: Option<String>,
    order: Option<String>,
) -> anyhow::Result<PageParams> {
    let order = match order.as_deref() {
        None => None,
        Some("asc") => Some(SortOrder::Asc),
        Some("desc") => Some(SortOrder::Desc),
        Some(other) => anyhow::bail!("Invalid order '{}', expected asc or desc", other),
    };
    Ok(PageParams {
        page,
        page_size,
        sort_by,
        order,
    })
}

fn load_items(
    files: &[PathBuf],
    names: &[String],
    meta_args: &[String],
) -> anyhow::Result<Vec<UploadItem>> {
    let metadata = meta_args
        .iter()
        .map(|arg| parse_meta_arg(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    files
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Invalid file name: {}", path.display()))?;
            let display_name = names.get(i).cloned().unwrap_or_default();
            Ok(UploadItem::new(
                FileSource::new(file_name, bytes),
                display_name,
                metadata.clone(),
            ))
        })
        .collect()
}

async fn upload_streaming(
    client: &ApiClient,
    items: Vec<UploadItem>,
    provider: i64,
    category: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let uploader = Arc::new(ClientUploader::new(client.clone(), provider, category));
    let config = EngineConfig {
        concurrency_limit: limit.unwrap_or(client.config().max_concurrent_uploads),
        ..EngineConfig::default()
    };
    let engine = UploadEngine::new(uploader, config);
    let mut events = engine.take_events().context("Event channel already taken")?;

    for item in items {
        engine.register(item);
    }

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                UploadEvent::Started => eprintln!("Transferring..."),
                UploadEvent::ItemSucceeded(success) => {
                    eprintln!("  ok  {} ({})", success.record.name, success.record.id);
                }
                UploadEvent::ItemFailed(failure) => {
                    eprintln!("  err {} [{}] {}", failure.handle, failure.kind, failure.detail);
                }
                UploadEvent::Completed(_) => {}
            }
        }
    });

    let report = engine.submit(None).await;
    drop(engine);
    printer.await.context("Event printer task failed")?;

    print_json(&serde_json::json!({
        "successful": report
            .successful
            .iter()
            .map(|s| serde_json::json!({ "ordinal": s.ordinal, "id": s.record.id, "name": s.record.name }))
            .collect::<Vec<_>>(),
        "failed": report
            .failed
            .iter()
            .map(|f| serde_json::json!({ "ordinal": f.ordinal, "kind": f.kind, "detail": f.detail }))
            .collect::<Vec<_>>(),
    }))
}

async fn run(client: &ApiClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let data = client.login(&username, &password).await?;
            print_json(&serde_json::json!({
                "success": true,
                "user": data.user,
            }))?;
        }
        Commands::Logout => {
            client.session().logout();
            print_json(&serde_json::json!({ "success": true, "message": "Logged out" }))?;
        }
        Commands::Whoami => match client.session().current_user() {
            Some(user) => print_json(&user)?,
            None => print_json(&serde_json::json!({ "message": "Not logged in" }))?,
        },
        Commands::Upload {
            files,
            name,
            meta,
            provider,
            category,
            limit,
            streaming,
        } => {
            anyhow::ensure!(!files.is_empty(), "No files given");
            let items = load_items(&files, &name, &meta)?;
            // Validation happens before any encoding or network activity.
            validate_upload_items(&items)?;

            if streaming {
                upload_streaming(client, items, provider, category, limit).await?;
            } else {
                let mut batch = UploadBatch::new(provider, items);
                if let Some(category) = category {
                    batch = batch.with_category(category);
                }
                let records = client.upload_batch(batch).await?;
                print_json(&records)?;
            }
        }
        Commands::Providers => {
            let providers = client.storage_providers().await?;
            print_json(&providers)?;
        }
        Commands::Files { page, page_size } => {
            let params = page_params(page, page_size, None, None)?;
            let (rows, meta) = client.list_files(&params).await?;
            print_json(&serde_json::json!({ "data": rows, "meta": meta }))?;
        }
        Commands::Categories {
            page,
            page_size,
            sort_by,
            order,
        } => {
            let params = page_params(page, page_size, sort_by, order)?;
            let (rows, meta) = client.list_categories(&params).await?;
            print_json(&serde_json::json!({ "data": rows, "meta": meta }))?;
        }
        Commands::Users {
            page,
            page_size,
            sort_by,
            order,
        } => {
            let params = page_params(page, page_size, sort_by, order)?;
            let (rows, meta) = client.list_users(&params).await?;
            print_json(&serde_json::json!({ "data": rows, "meta": meta }))?;
        }
        Commands::Stats => {
            let stats = client.dashboard_stats().await?;
            print_json(&stats)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env()
        .context("Failed to create API client. Set MEDIAVAULT_API_URL (or API_URL)")?;

    let cli = Cli::parse();
    let result = run(&client, cli.command).await;

    // A 401 clears the session and leaves a login redirect pending; surface
    // it so the user knows to re-authenticate.
    if client.navigator().take_pending_redirect().is_some() {
        tracing::warn!("Session was invalidated; run 'mediavault login' to continue");
    }

    result
}
