pub mod builder;
pub mod houses;
pub mod types;

pub use builder::{ChartBuilder, FIXED_ASCENDANT};
pub use houses::HouseCusps;
pub use types::{ChartSnapshot, MomentDescriptor, Placement, Placements, TransitComparison};
