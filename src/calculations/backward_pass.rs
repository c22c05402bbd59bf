use crate::planner::{PlanError, TripPlan};
use crate::transport::TransportTable;
use chrono::{Duration, NaiveTime};
use polars::prelude::*;

/// Fixed head start between waking up and leaving home.
pub const WAKE_UP_BUFFER_MINUTES: i64 = 5;

/// Back-calculates departure and wake-up times from the target arrival
/// time. Preparation minutes come from the task table, travel minutes from
/// the transport table; both are subtracted on a 24-hour wall clock that
/// wraps across midnight. Pure with respect to its inputs.
pub struct BackwardPass<'a> {
    df: &'a DataFrame,
    transports: &'a TransportTable,
}

impl<'a> BackwardPass<'a> {
    pub fn new(df: &'a DataFrame, transports: &'a TransportTable) -> Self {
        Self { df, transports }
    }

    pub fn execute(
        &self,
        transport_key: &str,
        arrival: NaiveTime,
        consider_traffic: bool,
    ) -> Result<TripPlan, PlanError> {
        let prep_minutes = self
            .preparation_minutes()
            .map_err(|err| PlanError::Computation(err.to_string()))?;
        let travel_minutes = self
            .transports
            .travel_minutes(transport_key, consider_traffic)
            .ok_or_else(|| PlanError::UnknownTransport {
                key: transport_key.to_string(),
            })?;

        // NaiveTime arithmetic wraps around midnight; only time-of-day is
        // surfaced, date rollover is not tracked.
        let departure = arrival - Duration::minutes(prep_minutes + travel_minutes);
        let wake_up = departure - Duration::minutes(WAKE_UP_BUFFER_MINUTES);

        Ok(TripPlan {
            prep_minutes,
            travel_minutes,
            departure,
            wake_up,
        })
    }

    /// Sum over every task, completed or not.
    fn preparation_minutes(&self) -> Result<i64, PolarsError> {
        if self.df.height() == 0 {
            return Ok(0);
        }
        Ok(self
            .df
            .column("duration_minutes")?
            .i64()?
            .sum()
            .unwrap_or(0))
    }
}
