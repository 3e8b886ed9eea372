//! iManage: administrative client for QR identity cards (iCard), shop
//! storefronts (iShop) and shop communities (iCom).
//!
//! The crate is layered the same way throughout:
//!
//! - [`api`] talks HTTP to the console API and the QR search backend and
//!   classifies failures;
//! - [`cache`] de-duplicates and caches reads keyed by resource + params and
//!   invalidates whole key families after mutations;
//! - [`search`] drives the paginated QR search as an explicit state machine;
//! - [`application`] wires the services that the command-line client uses.

pub mod api;
pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod search;
