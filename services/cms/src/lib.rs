//! services/cms/src/lib.rs
//!
//! A browser-based content manager for text, markdown and image documents
//! stored as files in one data directory.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
