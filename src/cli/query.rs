//! Query command: print the feed descriptor as JSON.

use crate::{
    cli::QueryArgs,
    config::SiteConfig,
    content::ContentStore,
    generator::feed::{FeedBuilder, FeedDescriptor, RequestContext},
    log,
};
use anyhow::{Context, Result};
use std::{fs, io::Write};

pub fn run_query(args: &QueryArgs, config: &SiteConfig, store: &dyn ContentStore) -> Result<()> {
    let feed = FeedBuilder::new(store, config)
        .build(&RequestContext::from_config(config))
        .context("Failed to build feed")?;

    let formatted = to_json(&feed, args.pretty)?;

    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        writeln!(file, "{}", formatted)?;
        log!("query"; "wrote output to {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

fn to_json(feed: &FeedDescriptor, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(feed)?
    } else {
        serde_json::to_string(feed)?
    };
    Ok(json)
}
