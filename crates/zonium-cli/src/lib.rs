//! zonium-cli
//! ==========
//!
//! Command-line interface for the `zonium-core` time-zone search.
//!
//! This crate primarily provides a binary (`zonium`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! cargo install zonium-cli
//! zonium --help
//! zonium search london
//! zonium --input raw-time-zones.json stats
//! printf 'l\nlo\nlon\n' | zonium interactive
//! ```
//!
//! For programmatic access to the index and the latest-wins search session,
//! use the [`zonium-core`] crate directly.
//!
//! Links
//! -----
//! - Repository: <https://github.com/codebysd/zonium>
//! - Core crate: <https://docs.rs/zonium-core>
//!
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable. The presence of this file enables a rendered page on docs.rs.
