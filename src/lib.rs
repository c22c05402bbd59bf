pub mod calculations;
pub mod history;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod planner;
pub mod preferences;
pub mod task;
pub(crate) mod task_validation;
pub mod transport;

pub use calculations::backward_pass::{BackwardPass, WAKE_UP_BUFFER_MINUTES};
pub use history::{HISTORY_LIMIT, History, HistoryEntry};
pub use planner::{PlanError, Planner, TripPlan};
pub use preferences::Preferences;
pub use task::Task;
pub use transport::{
    CAR_KEY, TransportConfigError, TransportOption, TransportTable, TransportTableConfig,
};
