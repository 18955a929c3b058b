//! # Waktu
//!
//! Malaysian prayer times from the JAKIM e-Solat service, cached locally.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Store → Lookup → CLI / Alfred
//! ```
//!
//! - [`fetcher`]: HTTP client and the yearly schedule fetch
//! - [`normalizer`]: Zone catalog HTML and schedule JSON into domain models
//! - [`store`]: SQLite persistence layer
//! - [`catalog`]: Zone lookup, populated from the remote catalog on first use
//!
//! ## Quick Start
//!
//! ```bash
//! # Today's prayer times for the preferred zone
//! waktu
//!
//! # For a specific zone
//! waktu get --zone SGR01
//!
//! # List zones and remember one
//! waktu zone
//! waktu set-zone JHR02
//!
//! # Alfred script-filter JSON
//! waktu --output alfred
//! ```

/// Application context, the lookup flow and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together
/// store, fetcher, catalog and schedule.
pub mod app;

/// Zone catalog backed by the store.
pub mod catalog;

/// Command-line interface using clap.
///
/// - `get [--zone ID] [--mode daily|weekly|monthly|yearly]` - Today's prayer times (default)
/// - `zone` - List all accepted zones
/// - `set-zone <ID>` - Set the default zone
/// - `update [--zone ID]` - Refetch this year's schedule
pub mod cli;

/// Configuration from `~/.config/waktu/config.toml` and the environment.
pub mod config;

/// Core domain models.
///
/// - [`Region`](domain::Region) and [`Zone`](domain::Zone): the zone catalog
/// - [`ScheduleEntry`](domain::ScheduleEntry): one day of prayer times
/// - [`ResolvedPeriod`](domain::ResolvedPeriod): a marker placed on the clock
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for raw fetches
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ScheduleFetcher`](fetcher::ScheduleFetcher): Yearly schedule download and caching
pub mod fetcher;

/// Remote payload parsing.
pub mod normalizer;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
