//! Resource providers for the Dossier report renderer.
//!
//! This crate provides platform-specific implementations of the
//! `ResourceProvider` trait from dossier-traits.
//!
//! ## Available Providers
//!
//! - [`HttpResourceProvider`]: Fetches `http(s)://` URLs with a per-request timeout
//! - [`FilesystemResourceProvider`]: Loads files from under a base directory
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory provider from dossier-traits:
//! - [`InMemoryResourceProvider`]: Pre-populated in-memory storage

mod filesystem;
mod http;

pub use filesystem::FilesystemResourceProvider;
pub use http::HttpResourceProvider;

pub use dossier_traits::InMemoryResourceProvider;
