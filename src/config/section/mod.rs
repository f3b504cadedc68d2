//! Configuration section definitions.
//!
//! Each module corresponds to a section in `blogfeed.toml`:
//!
//! | Module    | TOML Section  | Purpose                               |
//! |-----------|---------------|---------------------------------------|
//! | `site`    | `[site]`      | Site URL and base path                |
//! | `content` | `[content]`   | Content root and collection name      |
//! | `feed`    | `[feed]`      | RSS channel settings                  |
//! | `sitemap` | `[sitemap]`   | Sitemap generation                    |
//! | `build`   | `[build]`     | Output directory, minification        |
//! | `serve`   | `[serve]`     | Development server                    |

mod build;
mod content;
mod feed;
mod serve;
mod site;
mod sitemap;

pub use build::BuildConfig;
pub use content::ContentConfig;
pub use feed::FeedConfig;
pub use serve::ServeConfig;
pub use site::{DEFAULT_SITE_URL, SiteSectionConfig};
pub use sitemap::SitemapConfig;
