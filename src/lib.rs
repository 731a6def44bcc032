//! Pokedex Proxy - A caching read-through proxy for PokeAPI
//!
//! Serves Pokemon documents from a bounded TTL-aware LRU cache, falling back
//! to the upstream API on a miss, and searches the upstream name list.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use service::PokemonService;
pub use tasks::spawn_sweep_task;
