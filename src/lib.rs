//! livescroll-news library exports, shared by the binary and integration
//! tests.

pub mod app;
pub mod card;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod input;
pub mod source;
pub mod spinner;
pub mod ui;
