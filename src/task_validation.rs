use crate::task::Task;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.title.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} requires a non-empty title",
            task.id
        )));
    }

    if task.duration_minutes <= 0 {
        return Err(TaskValidationError::new(format!(
            "task {} has non-positive duration {}",
            task.id, task.duration_minutes
        )));
    }

    Ok(())
}
