//! Карточка графика метрики с переключателями отображения.

use contracts::analytics::{ChartView, Metric, MetricSeries};
use leptos::html;
use leptos::prelude::*;

use crate::analytics::state::use_dashboard;
use crate::analytics::ui::chart_canvas;

const CANVAS_WIDTH: u32 = 460;
const CANVAS_HEIGHT: u32 = 260;

/// График одной метрики. Перерисовывается при каждом изменении отчёта
/// или переключателей; canvas остаётся один и тот же DOM-узел.
#[component]
pub fn ChartCard(metric: Metric) -> impl IntoView {
    let state = use_dashboard();
    let view_signal = state.chart_view(metric);
    let canvas_ref = NodeRef::<html::Canvas>::new();

    Effect::new(move |_| {
        let report = state.report.get();
        let view = view_signal.get();

        let Some(canvas) = canvas_ref.get() else {
            return;
        };

        let series = MetricSeries::build(&report.records, metric);
        if let Err(err) = chart_canvas::draw(&canvas, &series, &view) {
            log::error!("Не удалось отрисовать график {}: {}", metric.as_str(), err);
        }
    });

    let toggle_class = move |active: bool| {
        if active {
            "chart-toggle active"
        } else {
            "chart-toggle"
        }
    };

    let toggle = move |update: fn(&mut ChartView)| {
        view_signal.update(update);
        log::info!(
            "График {}: режим {:?}",
            metric.as_str(),
            view_signal.get_untracked()
        );
    };

    view! {
        <div class="chart-card">
            <div class="chart-card-header">
                <h3>{metric.label()}</h3>
                <div class="chart-toggles">
                    <button
                        class=move || toggle_class(view_signal.get().logarithmic)
                        title="Логарифмическая шкала"
                        on:click=move |_| toggle(|v| v.logarithmic = !v.logarithmic)
                    >
                        "Log"
                    </button>
                    <button
                        class=move || toggle_class(view_signal.get().normalized)
                        title="Нормализация рядов"
                        on:click=move |_| toggle(|v| v.normalized = !v.normalized)
                    >
                        "Норм"
                    </button>
                    <button
                        class=move || toggle_class(view_signal.get().dual_axis)
                        title="Вторая ось Y"
                        on:click=move |_| toggle(|v| v.dual_axis = !v.dual_axis)
                    >
                        "2Y"
                    </button>
                </div>
            </div>
            <canvas
                node_ref=canvas_ref
                width=CANVAS_WIDTH
                height=CANVAS_HEIGHT
                class="metric-chart"
            ></canvas>
        </div>
    }
}
