//! Output generation.
//!
//! # Submodules
//!
//! - [`rss`]: Builds the RSS 2.0 feed from extracted articles (or an error
//!   feed when the run failed) and writes it to disk
//!
//! # Output Structure
//!
//! ```text
//! feed.xml   # fully overwritten on every run
//! ```

pub mod rss;
