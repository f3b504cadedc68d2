//! blogfeed - RSS feed and sitemap builder for a Markdown blog.

mod cli;
mod config;
mod content;
mod generator;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_site, query::run_query, serve::serve};
use config::SiteConfig;
use content::FsContentStore;
use std::sync::Arc;

fn main() -> Result<()> {
    // Before any blocking operation
    cli::serve::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.is_verbose());

    let config = SiteConfig::load(&cli)?;
    let store = FsContentStore::new(&config.content.dir);

    match &cli.command {
        Commands::Build { .. } => build_site(&config, &store),
        Commands::Serve { .. } => serve(&config, Arc::new(store)),
        Commands::Query { args } => run_query(args, &config, &store),
    }
}
