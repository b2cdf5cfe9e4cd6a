//! Configuration for the coded-message bridge: media resolution and reply lookup.
//!
//! Config files: `cqbridge.toml`, `cqbridge.yaml`, or `cqbridge.json`
//! Searched in `./` then `~/.config/cqbridge/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{ConfigSearch, config_dir, default_data_dir, discover_and_load, load_config},
    schema::{BridgeConfig, MediaConfig, ReplyConfig},
};
