pub mod api;
pub mod state;
pub mod storage;
pub mod ui;
