#![deny(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod auth;
pub mod board;
pub mod cards;
pub mod icom;
pub mod leaderboard;
pub mod members;
pub mod search;
pub mod shops;
