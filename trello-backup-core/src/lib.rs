#![doc = "trello-backup-core: export pipeline library for trello-backup."]

//! This crate contains the data models, the rate-limited Trello client and the
//! pipeline that flattens a whole workspace into CSV rows.
//! Concrete sinks and process bootstrap live in the `trello-backup` crate.
//!
//! # Usage
//! Build a [`fetch::TrelloFetcher`] over a [`client::RateLimitedClient`], pick a
//! [`contract::Sink`], and call [`backup::run_backup`].

pub mod aggregate;
pub mod backup;
pub mod client;
pub mod config;
pub mod contract;
pub mod custom_fields;
pub mod error;
pub mod export;
pub mod fetch;
pub mod history;
pub mod models;
pub mod row;
