//! The core value types of this crate.

mod datetime;
mod duration;

#[doc(inline)]
pub use datetime::PartialDateTime;
#[doc(inline)]
pub use duration::{Duration, PartialDuration};
