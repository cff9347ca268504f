use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bumpsemver::config;
use bumpsemver::diagnostics::TracingSink;
use bumpsemver::ui;
use bumpsemver::Context;

#[derive(clap::Parser)]
#[command(
    name = "bumpsemver",
    version,
    about = "Bump a part of a version string and print the result"
)]
struct Args {
    #[arg(help = "Part of the version to bump (e.g. major, minor, patch)")]
    part: Option<String>,

    #[arg(long, help = "Version to bump, overrides current_version from the configuration")]
    current_version: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Regex parsing the version string")]
    parse: Option<String>,

    #[arg(long, help = "Template to serialize the version with (repeatable)")]
    serialize: Vec<String>,

    #[arg(long, help = "Fail if the chosen format would drop a parsed part")]
    strict: bool,

    #[arg(long = "context", value_name = "KEY=VALUE", help = "Extra value for templates (repeatable)")]
    context: Vec<String>,

    #[arg(long, help = "Expose environment variables to templates as {$NAME}")]
    env: bool,

    #[arg(long, help = "List machine readable information instead of the new version")]
    list: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Console logging controlled by RUST_LOG (default: warn, or debug with --verbose)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;

    if let Some(parse) = args.parse {
        config.parse = parse;
    }
    if !args.serialize.is_empty() {
        config.serialize = args.serialize;
    }

    let current_version = args
        .current_version
        .or_else(|| config.current_version.clone())
        .ok_or_else(|| {
            anyhow!("No current version given; use --current-version or set current_version")
        })?;

    let version_config = config.version_config(Arc::new(TracingSink))?;

    let mut context = Context::new().with_timestamps();
    if args.env {
        context = context.with_environment();
    }
    for assignment in &args.context {
        context = context.with_assignment(assignment)?;
    }
    context.insert("current_version", current_version.as_str());

    let version = version_config.parse_required(&current_version)?;
    let order: Vec<&str> = version_config.order().collect();

    let Some(part) = args.part.as_deref() else {
        if args.list {
            println!("{}", ui::format_listing(&current_version, None, &order));
            println!("{}", ui::format_parts(&version, &order));
            return Ok(());
        }
        return Err(anyhow!("No part to bump given"));
    };

    let bumped = version_config
        .bump(&version, part)
        .with_context(|| format!("Failed to bump '{}'", part))?;

    let new_version = if args.strict {
        let template = version_config.choose_format(&bumped, &context, true)?;
        version_config.serialize_with(&bumped, template, &context, true)?
    } else {
        version_config.serialize(&bumped, &context)?
    };

    if args.list {
        println!(
            "{}",
            ui::format_listing(&current_version, Some(&new_version), &order)
        );
    } else {
        ui::display_version_change(&current_version, &new_version);
        println!("{}", new_version);
    }

    Ok(())
}
