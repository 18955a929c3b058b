pub mod period;
pub mod schedule;
pub mod zone;

pub use period::{format_timespan, ResolvedPeriod};
pub use schedule::{Marker, ScheduleEntry};
pub use zone::{Region, Zone};
