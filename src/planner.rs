use crate::calculations::backward_pass::BackwardPass;
use crate::history::{History, HistoryEntry};
use crate::preferences::Preferences;
use crate::task::Task;
use crate::task_validation::{self, TaskValidationError};
use crate::transport::{TransportConfigError, TransportTable, TransportTableConfig};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one backward pass, kept alongside the history entry it
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub prep_minutes: i64,
    pub travel_minutes: i64,
    pub departure: NaiveTime,
    pub wake_up: NaiveTime,
}

impl TripPlan {
    pub fn total_minutes(&self) -> i64 {
        self.prep_minutes + self.travel_minutes
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "prep={}min, travel={}min, depart={}, wake={}",
            self.prep_minutes,
            self.travel_minutes,
            self.departure.format("%H:%M"),
            self.wake_up.format("%H:%M")
        )
    }
}

#[derive(Debug, Clone)]
pub enum PlanError {
    MissingDestination,
    MissingArrivalTime,
    MissingTransport,
    UnknownTransport { key: String },
    Computation(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::MissingDestination => {
                write!(f, "select a destination before calculating")
            }
            PlanError::MissingArrivalTime => {
                write!(f, "select an arrival time before calculating")
            }
            PlanError::MissingTransport => {
                write!(f, "select a transport mode before calculating")
            }
            PlanError::UnknownTransport { key } => {
                write!(f, "unknown transport mode '{key}'")
            }
            PlanError::Computation(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PlanError {}

/// Single-owner application state: the task table, the current trip
/// selection, preferences, and the calculation history. Every operation is
/// synchronous and runs to completion.
pub struct Planner {
    df: DataFrame,
    transports: TransportTable,
    transports_is_custom: bool,
    preferences: Preferences,
    history: History,
    destination: Option<String>,
    arrival_time: Option<NaiveTime>,
    transport_key: Option<String>,
}

impl Planner {
    /// Starter checklist seeded by the CLI on launch.
    pub const DEFAULT_CHECKLIST: [(&'static str, i64); 4] = [
        ("Shower", 15),
        ("Breakfast", 20),
        ("Pack documents", 10),
        ("Check bag", 5),
    ];

    pub const DESTINATION_PRESETS: [&'static str; 4] =
        ["Office", "Home", "Gym", "Shopping mall"];

    fn from_parts(transports: TransportTable, transports_is_custom: bool) -> Self {
        let schema = Self::default_schema();
        let df = DataFrame::empty_with_schema(&schema);

        Self {
            df,
            transports,
            transports_is_custom,
            preferences: Preferences::default(),
            history: History::new(),
            destination: None,
            arrival_time: None,
            transport_key: None,
        }
    }

    pub fn new() -> Self {
        Self::from_parts(TransportTable::default(), false)
    }

    pub fn with_transport_table(transports: TransportTable) -> Self {
        Self::from_parts(transports, true)
    }

    pub fn with_default_checklist() -> Result<Self, PolarsError> {
        let mut planner = Self::new();
        for (title, minutes) in Self::DEFAULT_CHECKLIST {
            planner.add_task(title, minutes)?;
        }
        Ok(planner)
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::Int32),
            Field::new("title".into(), DataType::String),
            Field::new("duration_minutes".into(), DataType::Int64),
            Field::new("completed".into(), DataType::Boolean),
        ])
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let df = self.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, idx)?);
        }
        Ok(tasks)
    }

    pub fn find_task(&self, task_id: i32) -> Result<Option<Task>, PolarsError> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let ids = self.df.column("id")?.i32()?;
        for (idx, id_opt) in ids.into_iter().enumerate() {
            if id_opt == Some(task_id) {
                let task = Task::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(task));
            }
        }
        Ok(None)
    }

    fn next_task_id(&self) -> Result<i32, PolarsError> {
        if self.df.height() == 0 {
            return Ok(1);
        }
        let max = self
            .df
            .column("id")?
            .i32()?
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    fn validation_error(err: TaskValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    /// Appends a new task and returns its id. Rejected input leaves the
    /// table untouched and consumes no id.
    pub fn add_task(&mut self, title: &str, duration_minutes: i64) -> Result<i32, PolarsError> {
        let id = self.next_task_id()?;
        let task = Task::new(id, title, duration_minutes);
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(id)
    }

    /// Replaces title and duration of an existing task. `Ok(false)` when the
    /// id is unknown; the caller treats that as a no-op.
    pub fn edit_task(
        &mut self,
        task_id: i32,
        title: &str,
        duration_minutes: i64,
    ) -> Result<bool, PolarsError> {
        if self.find_task(task_id)?.is_none() {
            return Ok(false);
        }
        let candidate = Task::new(task_id, title, duration_minutes);
        task_validation::validate_task(&candidate).map_err(Self::validation_error)?;
        self.update_string_column("title", task_id, title)?;
        self.update_i64_column("duration_minutes", task_id, duration_minutes)?;
        Ok(true)
    }

    pub fn toggle_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        let Some(task) = self.find_task(task_id)? else {
            return Ok(false);
        };
        self.update_bool_column("completed", task_id, !task.completed)?;
        Ok(true)
    }

    pub fn delete_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        if self.df.height() == 0 {
            return Ok(false);
        }
        let snapshot = self.df.clone();
        let mut kept: Vec<Task> = Vec::with_capacity(snapshot.height());
        let mut found = false;
        for idx in 0..snapshot.height() {
            let task = Task::from_dataframe_row(&snapshot, idx)?;
            if task.id == task_id {
                found = true;
                continue;
            }
            kept.push(task);
        }
        if !found {
            return Ok(false);
        }

        self.df = DataFrame::empty_with_schema(&Self::default_schema());
        for task in kept {
            let row = task.to_dataframe_row()?;
            self.df = self.df.vstack(&row)?;
        }
        Ok(true)
    }

    /// Sum of every task's duration, completed or not.
    pub fn total_preparation_minutes(&self) -> Result<i64, PolarsError> {
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

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = Some(destination.into());
    }

    pub fn arrival_time(&self) -> Option<NaiveTime> {
        self.arrival_time
    }

    pub fn set_arrival_time(&mut self, arrival: NaiveTime) {
        self.arrival_time = Some(arrival);
    }

    pub fn transport_key(&self) -> Option<&str> {
        self.transport_key.as_deref()
    }

    pub fn set_transport(&mut self, key: impl Into<String>) -> Result<(), PlanError> {
        let key = key.into();
        if self.transports.get(&key).is_none() {
            return Err(PlanError::UnknownTransport { key });
        }
        self.transport_key = Some(key);
        Ok(())
    }

    pub fn transports(&self) -> &TransportTable {
        &self.transports
    }

    pub fn transports_is_custom(&self) -> bool {
        self.transports_is_custom
    }

    pub fn transport_table_config(&self) -> TransportTableConfig {
        self.transports.to_config()
    }

    pub fn set_transport_table(&mut self, transports: TransportTable) {
        self.transports = transports;
        self.transports_is_custom = true;
        self.clear_stale_transport_selection();
    }

    pub fn set_transport_table_from_config(
        &mut self,
        config: &TransportTableConfig,
    ) -> Result<(), TransportConfigError> {
        let transports = TransportTable::from_config(config)?;
        self.set_transport_table(transports);
        Ok(())
    }

    pub fn reset_transport_table_to_default(&mut self) {
        self.transports = TransportTable::default();
        self.transports_is_custom = false;
        self.clear_stale_transport_selection();
    }

    fn clear_stale_transport_selection(&mut self) {
        let stale = self
            .transport_key
            .as_deref()
            .is_some_and(|key| self.transports.get(key).is_none());
        if stale {
            self.transport_key = None;
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.preferences.dark_mode = enabled;
    }

    pub fn set_consider_traffic(&mut self, enabled: bool) {
        self.preferences.consider_traffic = enabled;
    }

    /// Newest first.
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Repopulates destination, arrival time, and transport selection from a
    /// recorded entry. The transport is matched back by label; an entry
    /// whose label no longer exists in the table leaves the transport
    /// selection unset. History itself is not mutated.
    pub fn apply_history_entry(&mut self, entry_id: i64) -> bool {
        let Some(entry) = self.history.find(entry_id) else {
            return false;
        };
        let destination = entry.destination.clone();
        let arrival = entry.arrival_time;
        let label = entry.transport_label.clone();

        self.destination = Some(destination);
        self.arrival_time = Some(arrival);
        self.transport_key = self
            .transports
            .find_by_label(&label)
            .map(|option| option.key.clone());
        true
    }

    /// Validates the current selection, runs the backward pass, and records
    /// a history entry stamped with `today`. The caller supplies the date so
    /// the computation stays deterministic.
    pub fn calculate(&mut self, today: NaiveDate) -> Result<TripPlan, PlanError> {
        let destination = self
            .destination
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(PlanError::MissingDestination)?;
        let arrival = self.arrival_time.ok_or(PlanError::MissingArrivalTime)?;
        let key = self
            .transport_key
            .clone()
            .ok_or(PlanError::MissingTransport)?;
        let label = self
            .transports
            .get(&key)
            .ok_or_else(|| PlanError::UnknownTransport { key: key.clone() })?
            .label
            .clone();

        let engine = BackwardPass::new(&self.df, &self.transports);
        let plan = engine.execute(&key, arrival, self.preferences.consider_traffic)?;

        self.history.record(
            &destination,
            arrival,
            &label,
            plan.departure,
            plan.wake_up,
            today,
        );
        Ok(plan)
    }

    fn update_string_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: &str,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .str()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<StringChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_i64_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: i64,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .i64()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<Int64Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_bool_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: bool,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .bool()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<BooleanChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_contains_expected_columns() {
        let schema = Planner::default_schema();
        for name in ["id", "title", "duration_minutes", "completed"] {
            assert!(schema.contains(name.into()), "missing column {name}");
        }
    }

    #[test]
    fn add_task_appends_and_assigns_ids() {
        let mut planner = Planner::new();
        let first = planner.add_task("Shower", 15).unwrap();
        let second = planner.add_task("Breakfast", 20).unwrap();
        assert_eq!((first, second), (1, 2));
        assert_eq!(planner.dataframe().height(), 2);

        let df = planner.dataframe();
        let title = df.column("title").unwrap().str().unwrap().get(0).unwrap();
        let dur = df
            .column("duration_minutes")
            .unwrap()
            .i64()
            .unwrap()
            .get(1)
            .unwrap();
        assert_eq!(title, "Shower");
        assert_eq!(dur, 20);
    }

    #[test]
    fn edit_task_updates_in_place() {
        let mut planner = Planner::new();
        planner.add_task("Shower", 15).unwrap();
        assert!(planner.edit_task(1, "Long shower", 25).unwrap());

        let task = planner.find_task(1).unwrap().unwrap();
        assert_eq!(task.title, "Long shower");
        assert_eq!(task.duration_minutes, 25);
    }
}
