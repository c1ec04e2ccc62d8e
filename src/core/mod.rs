pub mod nice_step;
pub mod scale;
pub mod series;
pub mod stacking;
pub mod threshold;
pub mod time_unit;
pub mod types;
pub mod value_range;

pub use nice_step::{DEFAULT_TARGET_TICKS, nice_ceil, nice_step};
pub use scale::LinearScale;
pub use series::{
    AlignedData, MetadataMap, MetricKind, MetricMetadata, Series, UNITLESS_CODE, UnitDescriptor,
};
pub use stacking::{Band, BandDirection, StackedData, destack_value, stack};
pub use threshold::{Threshold, ThresholdLevel, ThresholdLineStyle};
pub use time_unit::{TICK_SCALE_UNITS, TimeUnit};
pub use types::{PlotPadding, Point, Size, Viewport};
pub use value_range::{EMPTY_DATA_RANGE, ValueRangeBuilder};
