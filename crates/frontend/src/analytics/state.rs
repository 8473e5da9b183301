//! Явное состояние дашборда вместо модульных глобалов исходного приложения.
//!
//! Единственный владелец — контекст `DashboardState`; компоненты читают
//! сигналы и никогда не выводят состояние из DOM.

use contracts::analytics::{ChartView, DailyRecord, FilterSelection, Metric, ValidationError};
use leptos::prelude::*;

/// Аккордеон таблицы: раскрыта максимум одна кампания.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Option<String>,
}

impl Accordion {
    /// Переход по клику на заголовок кампании: повторный клик сворачивает,
    /// клик по другой кампании детерминированно сворачивает предыдущую.
    pub fn click(&mut self, campaign_id: &str) {
        if self.expanded.as_deref() == Some(campaign_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(campaign_id.to_string());
        }
    }

    pub fn is_expanded(&self, campaign_id: &str) -> bool {
        self.expanded.as_deref() == Some(campaign_id)
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn collapse_all(&mut self) {
        self.expanded = None;
    }
}

/// Данные последнего успешного запроса отчёта.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportData {
    pub records: Vec<DailyRecord>,
    /// Стоимость действия, с которой считался отчёт
    pub cost_per_action: f64,
    pub metric: Metric,
    /// Был ли вообще выполнен запрос (пустая таблица до первого запроса
    /// и явное состояние "нет данных" после — разные вещи)
    pub loaded: bool,
}

/// Разделяемое состояние страницы; сигналы Copy, компоненты берут снапшоты.
#[derive(Clone, Copy)]
pub struct DashboardState {
    pub filters: RwSignal<FilterSelection>,
    pub report: RwSignal<ReportData>,
    /// Текст сводного отчёта для активной метрики
    pub summary: RwSignal<String>,
    pub accordion: RwSignal<Accordion>,
    /// Ошибка валидации фильтров (подсветка полей + блокирующее уведомление)
    pub validation_error: RwSignal<Option<ValidationError>>,
    chart_views: [RwSignal<ChartView>; 3],
    /// Поколение запроса: устаревший ответ не затирает более новый
    fetch_generation: StoredValue<u64>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            filters: RwSignal::new(FilterSelection::default()),
            report: RwSignal::new(ReportData::default()),
            summary: RwSignal::new(String::new()),
            accordion: RwSignal::new(Accordion::default()),
            validation_error: RwSignal::new(None),
            chart_views: [
                RwSignal::new(ChartView::default()),
                RwSignal::new(ChartView::default()),
                RwSignal::new(ChartView::default()),
            ],
            fetch_generation: StoredValue::new(0),
        }
    }

    /// Сигнал переключателей графика данной метрики. Состояние живёт в
    /// течение сессии и переживает перерисовки, но не перезагрузку.
    pub fn chart_view(&self, metric: Metric) -> RwSignal<ChartView> {
        let index = match metric {
            Metric::Roi => 0,
            Metric::Cpa => 1,
            Metric::Ctr => 2,
        };
        self.chart_views[index]
    }

    /// Начинает новый цикл запроса; возвращает его поколение.
    pub fn next_generation(&self) -> u64 {
        let next = self.fetch_generation.get_value() + 1;
        self.fetch_generation.set_value(next);
        next
    }

    /// Актуален ли ответ данного поколения.
    pub fn is_current(&self, generation: u64) -> bool {
        self.fetch_generation.get_value() == generation
    }

    /// Сбрасывает данные отчёта и presentation-состояние (кнопка "Очистить").
    pub fn reset(&self) {
        self.report.set(ReportData::default());
        self.summary.set(String::new());
        self.accordion.update(|a| a.collapse_all());
        self.validation_error.set(None);
        self.filters.set(FilterSelection::default());
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook to use the dashboard state context.
pub fn use_dashboard() -> DashboardState {
    use_context::<DashboardState>().expect("DashboardState not found in context")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accordion_starts_all_collapsed() {
        let accordion = Accordion::default();
        assert_eq!(accordion.expanded_id(), None);
    }

    #[test]
    fn clicking_expands_then_collapses() {
        let mut accordion = Accordion::default();
        accordion.click("7");
        assert!(accordion.is_expanded("7"));
        accordion.click("7");
        assert_eq!(accordion.expanded_id(), None);
    }

    #[test]
    fn expanding_another_campaign_collapses_previous() {
        let mut accordion = Accordion::default();
        accordion.click("7");
        accordion.click("12");
        assert!(accordion.is_expanded("12"));
        assert!(!accordion.is_expanded("7"));
    }

    #[test]
    fn at_most_one_campaign_expanded_after_any_click_sequence() {
        let mut accordion = Accordion::default();
        let clicks = ["7", "12", "12", "7", "3", "3", "3", "12"];
        for id in clicks {
            accordion.click(id);
            let expanded = ["3", "7", "12"]
                .iter()
                .filter(|c| accordion.is_expanded(c))
                .count();
            assert!(expanded <= 1);
        }
    }
}
