//! Japanese natural-language deadline resolution.
//!
//! Text such as `明日の朝9時`, `来週の金曜`, `3日後` or `12/25 18:00` is
//! resolved against a reference "now" into one timestamp in a fixed zone.

mod error;
mod normalize;
mod resolver;
mod token;

pub use error::ParseError;
pub use resolver::{DeadlineResolver, TOKYO_OFFSET_SECS};
