pub mod activities;
pub use activities::{ActivityType, IntensityLevel};

pub mod session;
pub use session::{DerivedMetrics, MIN_DURATION_MINUTES, Session, SessionInput};

mod error;
pub use error::SessionError;
