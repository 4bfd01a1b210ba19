//! Conversion between internal canonical types and the two wire dialects
//!
//! `openai` normalizes client requests and renders tool calls for responses.
//! `google` builds backend requests and decodes backend chunks into
//! [`crate::types::UpstreamEvent`]s.

pub mod google;
pub mod openai;
