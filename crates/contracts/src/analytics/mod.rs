//! Аналитика кампаний: DTO обмена с бэкендом и чистая расчётная логика
//! (фильтры, агрегаты, серии графиков). Без DOM и без I/O.

pub mod dto;
pub mod filter;
pub mod rollup;
pub mod series;

pub use dto::{DailyRecord, Metric, PdfExportRequest, PdfRow};
pub use filter::{FilterSelection, ValidationError};
pub use rollup::CampaignRollup;
pub use series::{AxisSide, ChartView, MetricSeries};
