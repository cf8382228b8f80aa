//! Aggregation core for an EV registration analytics dashboard.
//!
//! Raw CSV rows flow through [`normalize`] once per dataset load; every
//! filter change then rebuilds a predicate ([`filter`]) and re-runs one of
//! the pure reducers in [`aggregate`], orchestrated by the caching
//! [`facade::Dashboard`]. [`adapter`] maps the results into the renderer's
//! series contract, and [`debounce`] collapses rapid filter changes so only
//! the latest configuration is ever aggregated.

pub mod adapter;
pub mod aggregate;
pub mod debounce;
pub mod facade;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod types;
pub mod util;

pub use facade::Dashboard;
pub use filter::{FilterConfig, RecencyWindow};
pub use types::{EvRecord, EvType, RawRow};
