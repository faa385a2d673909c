//! Shared helpers: identifier sentinels, signatures and input limits.

pub mod validation;
