//! canopy - content tree, navigation and slot inspector
//!
//! Loads a TOML content seed into an in-memory store and runs the tree,
//! navigation, slot and registration machinery against it.

mod cli;
mod display;
mod error;
mod views;

use crate::cli::{Cli, Commands, GlobalArgs, PageArgs};
use crate::display::{CommandOutput, OutputRenderer, SlotReport, TreeRow};
use crate::error::CliError;
use canopy_api::{register, MemoryUsers, RegisterOutcome, Site};
use canopy_config::Config;
use canopy_content::{ContentSeed, ContentStore, MemoryStore};
use canopy_tree::{local_navigation, AllowAll, NavigationOptions, NodesTree};
use canopy_types::{ContentNode, Request, RequestMethod, SlotName};
use clap::Parser;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    let config = match load_config(&cli.global, &cli.command).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(
        json_mode || config.logging.json,
        cli.global.debug,
        &config.logging.level,
    );

    if let Err(e) = run(cli, config).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Config file (or defaults), then environment, then CLI flags
async fn load_config(global: &GlobalArgs, command: &Commands) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, command);
    Ok(config)
}

fn apply_cli_config(config: &mut Config, command: &Commands) {
    match command {
        Commands::Nav {
            include_root: true, ..
        } => config.navigation.include_root = true,
        Commands::Register { group, role, .. } => {
            if let Some(group) = group {
                config.register.group = Some(group.clone());
            }
            if let Some(role) = role {
                config.register.role = Some(role.clone());
            }
        }
        _ => {}
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("Starting canopy v{}", env!("CARGO_PKG_VERSION"));

    let renderer = OutputRenderer::new(cli.global.json);
    let result = execute_command(cli.command, config).await?;
    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

async fn execute_command(command: Commands, config: Config) -> Result<CommandOutput, CliError> {
    match command {
        Commands::Tree { page, navigation } => {
            let (store, context) = load_page(&page).await?;
            let tree = NodesTree::build(&store, Some(context.id))?;
            let nodes = if navigation {
                tree.tolist_in_navigation()
            } else {
                tree.tolist()
            };
            let rows = nodes
                .into_iter()
                .map(|node| TreeRow {
                    depth: tree.find(node.id).map_or(0, |found| found.depth()),
                    node: node.clone(),
                })
                .collect();
            Ok(CommandOutput::Tree {
                rows,
                outline: tree.root().to_outline(),
            })
        }

        Commands::Nav { page, .. } => {
            let (store, context) = load_page(&page).await?;
            let request = page_request(&page, RequestMethod::Get);
            let options = NavigationOptions {
                include_root: config.navigation.include_root,
            };
            let nav = local_navigation(&store, &AllowAll, context.id, &request, options)?;
            Ok(CommandOutput::Navigation(nav))
        }

        Commands::Slots {
            page,
            method,
            xhr,
            slot,
        } => {
            let (store, context) = load_page(&page).await?;
            let store: Arc<dyn ContentStore + Send + Sync> = Arc::new(store);
            let options = NavigationOptions {
                include_root: config.navigation.include_root,
            };
            let views = views::builtin_views(&store, options);
            let site = Site::new(config, store, Arc::new(views))?;

            let request = page_request(&page, method).with_xhr(xhr);
            let mut api = site.template_api(context.id, &request)?;

            let names: Vec<String> = match slot {
                Some(name) => vec![name],
                None => SlotName::ALL.iter().map(|slot| slot.to_string()).collect(),
            };
            let mut slots = Vec::with_capacity(names.len());
            for name in names {
                let fragments = api.slot(&name)?.to_vec();
                slots.push(SlotReport {
                    slot: name,
                    fragments,
                });
            }
            Ok(CommandOutput::Slots {
                page_title: api.page_title()?,
                bare: api.bare(),
                slots,
            })
        }

        Commands::Register {
            title, name, email, ..
        } => {
            let mut request = Request::post().with_post("register", "register");
            for (field, value) in [("title", title), ("name", name), ("email", email)] {
                if let Some(value) = value {
                    request = request.with_post(field, value);
                }
            }
            let mut users = MemoryUsers::new();
            let outcome = register(&request, &config.register, &mut users)?;
            let user = match &outcome {
                RegisterOutcome::Redirect { .. } => users.users().first().cloned(),
                RegisterOutcome::Form(_) => None,
            };
            Ok(CommandOutput::Register { outcome, user })
        }
    }
}

/// Seeded store plus the node at `page.path`
async fn load_page(page: &PageArgs) -> Result<(MemoryStore, ContentNode), CliError> {
    let seed = ContentSeed::load_from_file(&page.content).await?;
    let store = seed.into_store()?;
    let context = store.traverse(&page.path)?;
    info!(path = %page.path, node = %context.id, "Resolved context");
    Ok((store, context))
}

fn page_request(page: &PageArgs, method: RequestMethod) -> Request {
    let request = Request::new(method).with_view_name("view");
    match &page.user {
        Some(user) => request.with_user(user.clone()),
        None => request,
    }
}

/// Logs always go to stderr so stdout stays parseable
fn init_tracing(json: bool, debug_enabled: bool, level: &str) {
    let default_filter = if debug_enabled {
        "debug".to_string()
    } else {
        level.to_string()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}
