//! Персистентность фильтров и текстов отчётов в localStorage.
//!
//! Всё best-effort: отсутствующий или повреждённый blob — это штатное
//! состояние "нет сохранённых фильтров", а не ошибка.

use contracts::analytics::{FilterSelection, Metric};
use web_sys::window;

const FILTERS_KEY: &str = "filters";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Ключ сохранённого текста отчёта для метрики (как в исходном приложении).
fn report_key(metric: Metric) -> &'static str {
    match metric {
        Metric::Roi => "roiReport",
        Metric::Cpa => "cpaReport",
        Metric::Ctr => "ctrReport",
    }
}

/// Save the current filter selection, overwriting any prior value.
pub fn save_filters(selection: &FilterSelection) {
    let Ok(json) = serde_json::to_string(selection) else {
        return;
    };
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(FILTERS_KEY, &json);
    }
}

/// Restore the persisted filter selection, if any.
pub fn load_filters() -> Option<FilterSelection> {
    let raw = get_local_storage()?.get_item(FILTERS_KEY).ok()??;
    match serde_json::from_str(&raw) {
        Ok(selection) => Some(selection),
        Err(err) => {
            log::warn!("Сохранённые фильтры не разобраны, игнорирую: {}", err);
            None
        }
    }
}

/// Save the generated report text for a metric.
pub fn save_report(metric: Metric, text: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(report_key(metric), text);
    }
}

/// Load the last generated report text for a metric.
pub fn load_report(metric: Metric) -> Option<String> {
    get_local_storage()?.get_item(report_key(metric)).ok()?
}

/// Remove the filter blob and all cached report texts.
pub fn clear_all() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(FILTERS_KEY);
        for metric in Metric::all() {
            let _ = storage.remove_item(report_key(metric));
        }
    }
}
