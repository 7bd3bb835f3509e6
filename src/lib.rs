pub mod app;
pub mod calendar;
pub mod errors;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod state;
pub mod storage;
pub mod summary;
pub mod ui;

pub use app::router;
pub use calendar::{MonthCursor, advance_month, build_grid, date_clicked, log_date_set};
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use summary::{compute_stats, default_window};
