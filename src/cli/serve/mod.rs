//! Development server.
//!
//! Serves the feed and the sitemap under the configured base path. Every
//! request reads the collection again, so edits show up on reload.

mod lifecycle;
mod response;

pub use lifecycle::setup_shutdown_handler;

use crate::{
    config::SiteConfig,
    content::ContentStore,
    generator::{
        feed::{FeedBuilder, FeedSerializer, RequestContext, rss::RssSerializer},
        minify_xml,
        sitemap::Sitemap,
    },
    log,
    utils::mime,
};
use anyhow::{Context, Result};
use std::{path::Path, sync::Arc};
use tiny_http::{Method, Request, Server};

/// Documents the server knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Feed,
    Sitemap,
}

impl Route {
    /// Match a request URL (query and fragment ignored) against enabled routes.
    fn resolve(url: &str, config: &SiteConfig) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let base = config.site.base_path();
        let relative = path.strip_prefix(&base)?;

        if config.feed.enable && relative == url_path(&config.feed.path) {
            Some(Self::Feed)
        } else if config.sitemap.enable && relative == url_path(&config.sitemap.path) {
            Some(Self::Sitemap)
        } else {
            None
        }
    }

    fn render(self, config: &SiteConfig, store: &dyn ContentStore) -> Result<(&'static str, String)> {
        let feed = FeedBuilder::new(store, config).build(&RequestContext::from_config(config))?;

        let (content_type, body) = match self {
            Self::Feed => (RssSerializer.content_type(), RssSerializer.render(&feed)?),
            Self::Sitemap => (
                mime::types::XML,
                Sitemap::from_feed(&feed, config).into_xml(),
            ),
        };

        Ok((content_type, minify_xml(&body, config.build.minify).into_owned()))
    }
}

/// Relative output path as a URL path without leading slash.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Bind the server and handle requests until Ctrl+C.
pub fn serve(config: &SiteConfig, store: Arc<dyn ContentStore>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    let base = config.site.base_path();
    log!("serve"; "http://{}{}", addr, base);
    if config.feed.enable {
        log!("serve"; "rss: http://{}{}{}", addr, base, url_path(&config.feed.path));
    }
    if config.sitemap.enable {
        log!("serve"; "sitemap: http://{}{}{}", addr, base, url_path(&config.sitemap.path));
    }

    run_request_loop(&server, Arc::new(config.clone()), store)
}

fn run_request_loop(
    server: &Server,
    config: Arc<SiteConfig>,
    store: Arc<dyn ContentStore>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(&config);
        let store = Arc::clone(&store);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, store.as_ref()) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig, store: &dyn ContentStore) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    let Some(route) = Route::resolve(request.url(), config) else {
        return response::respond_not_found(request);
    };

    match route.render(config, store) {
        Ok((content_type, body)) => response::respond_document(request, content_type, body),
        Err(e) => {
            log!("serve"; "{} failed: {:#}", request.url(), e);
            response::respond_error(request, &e)
        }
    }
}
