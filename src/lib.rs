//! # kennel-match
//!
//! Matching core for a dog-breeding marketplace: compatibility scoring
//! and the match-request lifecycle.
//!
//! Owners register breeding profiles, browse ranked candidates for their
//! dogs, and take a pairing through request, acceptance, meeting, and a
//! verified outcome. The scorer is a pure function over two profiles; the
//! lifecycle is a permission-checked state machine over a shared registry.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── DogService, MatchService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── DogRegistry, MatchRegistry (domain/)
//!     ├── Compatibility scorer (domain/scoring)
//!     │
//!     └── PostgreSQL Persistence (event log + snapshots)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
