//! # BIM Explorer
//!
//! Pulls commits from a Speckle server and flattens their element data into
//! tables ready for filtering, export or downstream agents.
//!
//! ## Features
//!
//! - Legacy (`speckle.xyz`) and current (`app.speckle.systems`) layouts
//! - Category discovery, skipping project metadata blocks
//! - Parameter discovery across heterogeneous elements
//! - Row-per-element tables with data-bearing columns first
//! - Export to CSV and JSON
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bim_explorer::project::{CommitCache, Explorer, ProjectRegistry};
//! use bim_explorer::source::SpeckleSource;
//!
//! let registry = ProjectRegistry::load("projects.toml")?;
//! let explorer = Explorer::new(SpeckleSource::new(), registry, Arc::new(CommitCache::new()))
//!     .with_token("my-token");
//!
//! let project = explorer.resolve("Revit Demo Haus")?;
//! for category in explorer.categories(&project)? {
//!     let table = explorer.table(&project, &category, None)?;
//!     println!("{category}: {} rows", table.row_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod project;
pub mod source;
pub mod ui;
