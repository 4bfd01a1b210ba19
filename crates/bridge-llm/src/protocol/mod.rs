//! Wire format types for the two protocols the bridge speaks
//!
//! Pure serde structs matching each side's JSON format. `openai` is the
//! client-facing dialect, `google` the backend's. These are only used at the
//! boundary; conversions live in [`crate::convert`].

pub mod google;
pub mod openai;
