//! Command line interface definition

use canopy_types::RequestMethod;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// canopy - content tree, navigation and slot inspector
#[derive(Parser)]
#[command(name = "canopy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect content trees, local navigation and page slots")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments shared by commands that render a page of a content seed
#[derive(Parser)]
pub struct PageArgs {
    /// TOML file describing the content hierarchy
    #[arg(long, value_name = "FILE")]
    pub content: PathBuf,

    /// Path of the context node, e.g. /about/team (default: the root)
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Principal making the request
    #[arg(long)]
    pub user: Option<String>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the content tree below a node
    Tree {
        #[command(flatten)]
        page: PageArgs,

        /// Only show nodes that appear in navigation
        #[arg(long)]
        navigation: bool,
    },

    /// Show the local navigation for a node
    Nav {
        #[command(flatten)]
        page: PageArgs,

        /// Let the site root act as the navigation parent
        #[arg(long)]
        include_root: bool,
    },

    /// Render page slots for a node
    Slots {
        #[command(flatten)]
        page: PageArgs,

        /// Request method to simulate
        #[arg(long, value_enum, default_value_t = RequestMethod::Get)]
        method: RequestMethod,

        /// Simulate an XHR request
        #[arg(long)]
        xhr: bool,

        /// Only render this slot (default: all)
        #[arg(long)]
        slot: Option<String>,
    },

    /// Submit the self-registration form
    Register {
        /// Full name
        #[arg(long)]
        title: Option<String>,

        /// User name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Group to add the user to (overrides config)
        #[arg(long)]
        group: Option<String>,

        /// Role to grant the user (overrides config)
        #[arg(long)]
        role: Option<String>,
    },
}
