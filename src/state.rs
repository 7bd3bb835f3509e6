use crate::models::AppData;
use chrono::{DateTime, Local, NaiveDate};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Source of "now" for every handler; tests pin it to a fixed instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub journal: Arc<Mutex<AppData>>,
    clock: Clock,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self::with_clock(data_path, data, Arc::new(Local::now))
    }

    pub fn with_clock(data_path: PathBuf, data: AppData, clock: Clock) -> Self {
        Self {
            data_path,
            journal: Arc::new(Mutex::new(data)),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
