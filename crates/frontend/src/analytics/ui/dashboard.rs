//! Страница отчёта: единственный контроллер, связывающий фильтры,
//! загрузку данных, таблицу, графики и экспорт.

use contracts::analytics::rollup::generate_report;
use contracts::analytics::Metric;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::analytics::api;
use crate::analytics::state::{use_dashboard, DashboardState, ReportData};
use crate::analytics::storage;
use crate::analytics::ui::charts::ChartCard;
use crate::analytics::ui::export_menu::ExportMenu;
use crate::analytics::ui::filter_bar::FilterBar;
use crate::analytics::ui::report_table::ReportTable;
use crate::shared::theme::ThemeToggle;
use crate::shared::toast::{use_toast, ToastService};

/// Интервал автообновления отчёта.
const AUTO_REFRESH_MS: u32 = 30_000;

/// Применяет текущие фильтры: валидация, сохранение, запрос, пересчёт.
///
/// В тихом режиме (автообновление) ошибка валидации проглатывается и запрос
/// не выполняется. Перекрывающиеся запуски не исключаются; от затирания
/// свежего ответа устаревшим защищает счётчик поколений.
pub fn apply_filters(state: DashboardState, toasts: ToastService, silent: bool) {
    let selection = state.filters.get_untracked();

    if let Err(err) = selection.validate() {
        if !silent {
            log::warn!("Фильтры не прошли валидацию: {}", err);
            toasts.show(format!("⚠️ {}", err));
            state.validation_error.set(Some(err));
        }
        return;
    }
    state.validation_error.set(None);

    // Валидация гарантирует разбираемую положительную стоимость
    let Some(cost) = selection.cost() else {
        return;
    };

    storage::save_filters(&selection);
    log::info!("Фильтры отправлены на сервер");

    let generation = state.next_generation();
    spawn_local(async move {
        let records = api::fetch_report(&selection).await;

        // Пока ждали ответ, мог уйти более новый запрос
        if !state.is_current(generation) {
            log::debug!("Ответ поколения {} устарел — пропускаю", generation);
            return;
        }

        let metric = selection.metric;
        if records.is_empty() {
            log::info!("Нет данных по выбранным кампаниям");
        }

        let summary = generate_report(&records, cost, metric);
        storage::save_report(metric, &summary);
        state.summary.set(summary);
        state.report.set(ReportData {
            records,
            cost_per_action: cost,
            metric,
            loaded: true,
        });
    });
}

/// Главная страница дашборда.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_dashboard();
    let toasts = use_toast();

    // Восстановление сохранённых фильтров и последнего текста отчёта
    if let Some(saved) = storage::load_filters() {
        if let Some(text) = storage::load_report(saved.metric) {
            state.summary.set(text);
        }
        state.filters.set(saved);
    }

    // Первичный запрос: тихий, чтобы пустые поля не встречали пользователя
    // блокирующим уведомлением
    apply_filters(state, toasts, true);

    // Автообновление с фиксированным интервалом, всегда в тихом режиме
    spawn_local(async move {
        loop {
            TimeoutFuture::new(AUTO_REFRESH_MS).await;
            log::info!("Автообновление фильтров");
            apply_filters(state, toasts, true);
        }
    });

    let on_apply = Callback::new(move |_: ()| apply_filters(state, toasts, false));
    let on_clear = Callback::new(move |_: ()| {
        storage::clear_all();
        state.reset();
        toasts.show("🧹 Фильтры и отчёт очищены");
        log::info!("Пользователь очистил фильтры");
    });

    let metric_indicator = move || {
        let report = state.report.get();
        if report.loaded {
            format!("📊 Текущая метрика: {}", report.metric.label())
        } else {
            "📊 Текущая метрика: —".to_string()
        }
    };

    view! {
        <div class="report-container">
            <header class="report-header">
                <h1>"Аналитика рекламных кампаний"</h1>
                <Flex align=FlexAlign::Center gap=FlexGap::Small>
                    <ExportMenu />
                    <ThemeToggle />
                </Flex>
            </header>

            <FilterBar on_apply=on_apply on_clear=on_clear />

            <div class="report-body">
                <div class="table-panel">
                    <div id="metric-indicator" class="metric-indicator">
                        {metric_indicator}
                    </div>
                    <ReportTable />
                    <pre id="roi-summary" class="report-summary">
                        {move || state.summary.get()}
                    </pre>
                </div>

                <div class="charts-panel">
                    <ChartCard metric=Metric::Roi />
                    <ChartCard metric=Metric::Cpa />
                    <ChartCard metric=Metric::Ctr />
                </div>
            </div>
        </div>
    }
}
