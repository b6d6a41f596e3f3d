//! Route handlers

pub mod meta;
pub mod predict;
