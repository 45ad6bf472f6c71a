//! Command-line interface definitions for the WBTV RSS generator.
//!
//! Every argument is optional. Running the binary bare fetches the WBTV
//! listing page and writes `feed.xml` in the working directory.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Defaults: write ./feed.xml
/// wbtv_rss
///
/// # Publish into a site directory with custom channel metadata
/// wbtv_rss -o public/feed.xml -c feed.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the RSS file to write (overwritten on every run)
    #[arg(short, long, default_value = "feed.xml")]
    pub output: PathBuf,

    /// Optional YAML file overriding feed metadata and fetch settings
    #[arg(short, long, env = "WBTV_RSS_CONFIG")]
    pub config: Option<PathBuf>,
}
