//! Key-value storage types.

/// Storage key holding the array of saved builds.
pub const MANAGER_KEY: &str = "BM_MANAGER";

/// Storage key holding the active selection (a build or null).
pub const CURRENT_KEY: &str = "BM_CURRENT";

/// Storage key holding remembered equipment-set labels.
pub const INVENTORY_KEY: &str = "BM_INVENTORY";

