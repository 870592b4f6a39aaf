// ReelShelf shared type definitions
// Each submodule defines types used across the application.

pub mod auth;
pub mod backup;
pub mod category;
pub mod errors;
pub mod link;
pub mod platform;
pub mod settings;
pub mod share;
pub mod video;

use serde::{Deserialize, Deserializer};

/// Deserializes a present field (including `null`) as `Some`, so that an
/// `Option<Option<T>>` with `#[serde(default)]` distinguishes "absent" from "null".
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
