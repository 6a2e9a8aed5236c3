//! Sentinel: valuation-band DCA signal bot.
//!
//! Evaluates a market snapshot against fixed decision bands, renders the
//! recommendation as a Markdown report and delivers it over Telegram, which
//! also carries the inbound command channel.

pub mod config;
pub mod core;
pub mod delivery;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;
