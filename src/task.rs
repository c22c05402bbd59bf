use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: i32, title: impl Into<String>, duration_minutes: i64) -> Self {
        Self {
            id,
            title: title.into(),
            duration_minutes,
            completed: false,
        }
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(4);

        let id_data: [i32; 1] = [self.id];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let title_data: [&str; 1] = [self.title.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("title"), title_data).into_column());

        let duration_data: [i64; 1] = [self.duration_minutes];
        columns.push(
            Series::new(PlSmallStr::from_static("duration_minutes"), duration_data).into_column(),
        );

        let completed_data: [bool; 1] = [self.completed];
        columns
            .push(Series::new(PlSmallStr::from_static("completed"), completed_data).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing id".into()))?;

        let title = df
            .column("title")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let duration_minutes = df
            .column("duration_minutes")?
            .i64()?
            .get(row_idx)
            .unwrap_or(0);

        let completed = df
            .column("completed")?
            .bool()?
            .get(row_idx)
            .unwrap_or(false);

        Ok(Self {
            id,
            title,
            duration_minutes,
            completed,
        })
    }
}
