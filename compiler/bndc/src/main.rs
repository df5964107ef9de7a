//! `bndc`: build binding registries and resolve binding calls.
//!
//! Enable logging with `RUST_LOG=bnd_resolve=trace` (or any `EnvFilter`
//! directive).

mod commands;
mod error;
mod session;

use std::io;
use std::path::PathBuf;
use std::sync::Once;

use bnd_resolve::{Resolver, ResolverConfig};
use clap::{Args, Parser, Subcommand};

use crate::commands::Expressions;
use crate::error::CliError;
use crate::session::{ConfigOverrides, RegistrySources};

#[derive(Parser)]
#[command(name = "bndc")]
#[command(about = "Binding adapter registry and resolver", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a registry snapshot from fact files and upstream snapshots
    Snapshot {
        #[command(flatten)]
        registry: RegistryArgs,
        /// Snapshot file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Resolve the setter for one attribute
    Setter {
        #[command(flatten)]
        resolve: ResolveArgs,
        #[arg(long)]
        attribute: String,
        /// View type; omit when unknown
        #[arg(long)]
        view: Option<String>,
        /// Type of the bound value
        #[arg(long)]
        value: String,
    },

    /// Resolve the getter and change event of a two-way binding
    Getter {
        #[command(flatten)]
        resolve: ResolveArgs,
        #[arg(long)]
        attribute: String,
        #[arg(long)]
        view: String,
        /// Type of the bound expression, if known
        #[arg(long)]
        value: Option<String>,
    },

    /// Cover several attributes with multi-attribute adapters
    Multi {
        #[command(flatten)]
        resolve: ResolveArgs,
        #[arg(long)]
        view: String,
        /// `attribute=Type`, repeatable
        #[arg(long = "attribute", required = true)]
        attributes: Vec<String>,
    },

    /// List the contents of a registry snapshot
    Dump {
        /// Snapshot file to read
        snapshot: PathBuf,
    },
}

#[derive(Args)]
struct RegistryArgs {
    /// JSON fact file, repeatable
    #[arg(long)]
    facts: Vec<PathBuf>,
    /// Upstream snapshot, repeatable; earlier snapshots win
    #[arg(long)]
    upstream: Vec<PathBuf>,
    /// Class being recompiled; its upstream facts are dropped
    #[arg(long = "clear")]
    clear: Vec<String>,
}

impl RegistryArgs {
    fn sources(&self) -> RegistrySources<'_> {
        RegistrySources {
            upstream: &self.upstream,
            stale_classes: &self.clear,
            facts: &self.facts,
        }
    }
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    /// JSON class graph
    #[arg(long)]
    universe: PathBuf,
    /// Listener type passed to two-way event setters
    #[arg(long)]
    listener_type: Option<String>,
    /// Base class of generated binders
    #[arg(long)]
    binder_type: Option<String>,
    /// API level for calls that carry none
    #[arg(long)]
    min_api: Option<u32>,
    /// Expression for the binding component
    #[arg(long)]
    component: Option<String>,
    /// Expression for the target view
    #[arg(long, default_value = "view")]
    view_expr: String,
    /// Print a JSON report
    #[arg(long)]
    json: bool,
}

impl ResolveArgs {
    fn config(&self) -> ResolverConfig {
        ConfigOverrides {
            listener_type: self.listener_type.clone(),
            binder_type: self.binder_type.clone(),
            min_api: self.min_api,
        }
        .apply(ResolverConfig::default())
    }

    fn expressions(&self) -> Expressions {
        Expressions {
            component: self.component.clone(),
            view: self.view_expr.clone(),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Snapshot { registry, output } => {
            let registry = session::load_registry(&registry.sources())?;
            commands::snapshot(&registry, &output, &mut out)
        }
        Commands::Setter {
            resolve,
            attribute,
            view,
            value,
        } => {
            let registry = session::load_registry(&resolve.registry.sources())?;
            let universe = session::load_universe(&resolve.universe)?;
            let resolver = Resolver::with_config(&registry, &universe, resolve.config());
            let view = view.as_deref().map(session::parse_type).transpose()?;
            let value = session::parse_type(&value)?;
            commands::setter(
                &resolver,
                &attribute,
                view.as_ref(),
                &value,
                &resolve.expressions(),
                resolve.json,
                &mut out,
            )
        }
        Commands::Getter {
            resolve,
            attribute,
            view,
            value,
        } => {
            let registry = session::load_registry(&resolve.registry.sources())?;
            let universe = session::load_universe(&resolve.universe)?;
            let resolver = Resolver::with_config(&registry, &universe, resolve.config());
            let view = session::parse_type(&view)?;
            let value = value.as_deref().map(session::parse_type).transpose()?;
            commands::getter(
                &resolver,
                &attribute,
                &view,
                value.as_ref(),
                &resolve.expressions(),
                resolve.json,
                &mut out,
            )
        }
        Commands::Multi {
            resolve,
            view,
            attributes,
        } => {
            let registry = session::load_registry(&resolve.registry.sources())?;
            let universe = session::load_universe(&resolve.universe)?;
            let resolver = Resolver::with_config(&registry, &universe, resolve.config());
            let view = session::parse_type(&view)?;
            let bindings = attributes
                .iter()
                .map(|binding| session::parse_binding(binding))
                .collect::<Result<Vec<_>, _>>()?;
            commands::multi(
                &resolver,
                &bindings,
                &view,
                &resolve.expressions(),
                resolve.json,
                &mut out,
            )
        }
        Commands::Dump { snapshot } => {
            let registry = bnd_registry::RegistrySnapshot::read(&snapshot)?.to_registry()?;
            commands::dump(&registry, &mut out)
        }
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        tracing::error!(%err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
