pub mod detector;
pub mod types;

pub use detector::{angular_separation, most_significant, AspectDetector};
pub use types::{AspectMatch, AspectRule, AspectTable, BodyRef, ChartLayer};
