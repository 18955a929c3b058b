pub mod context;
pub mod error;
pub mod lookup;

pub use context::AppContext;
pub use error::{Result, WaktuError};
pub use lookup::{DaySchedule, LookupMode};
