#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod download;
pub mod extract;
pub mod mirror;
pub mod walk;

pub use config::{MirrorConfig, MirrorLayout};
pub use download::{Downloader, FetchOutcome};
pub use extract::{AssetKind, Patterns};
pub use mirror::{AssetMirror, MirrorReport};
pub use walk::DocumentKind;
