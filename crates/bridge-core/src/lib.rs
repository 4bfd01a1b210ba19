//! Request-scoped primitives shared by the bridge crates

#![allow(clippy::must_use_candidate)]

mod context;

pub use context::{REQUEST_ID_HEADER, RequestContext};
