//! Names of the persisted session markers. The two are written and removed
//! together; a store holding one without the other is a half-cleared state
//! the bootstrap recovery path exists to repair.

pub const REMEMBER: &str = "remember";
pub const AUTH_TOKEN: &str = "auth";
