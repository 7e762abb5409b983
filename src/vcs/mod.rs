//! Version-control integration: typed process runner and staged-addition listing.

pub mod process;
pub mod staged;
