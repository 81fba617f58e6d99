//! Widget modules for UI rendering.
//!
//! Each widget is a pure function that reads the engine and renders to a
//! terminal frame:
//! - Read-only access to the engine (immutable)
//! - No side effects or state mutations

pub mod backpack;
pub mod footer;
pub mod header;
pub mod map;
pub mod messages;
