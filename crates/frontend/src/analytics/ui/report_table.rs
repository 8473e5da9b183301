//! Таблица отчёта: заголовок-аккордеон на кампанию плюс её дневные строки.

use contracts::analytics::rollup::group_by_campaign;
use contracts::analytics::DailyRecord;
use leptos::prelude::*;

use crate::analytics::state::use_dashboard;
use crate::analytics::ui::{series_color, series_fill};

/// Колонки таблицы; порядок совпадает со строками PDF-экспорта.
pub const COLUMNS: [&str; 6] = [
    "Дата",
    "Действия",
    "Вознаграждение",
    "ROI %",
    "CPA",
    "Действий/ед.",
];

const ROI_THRESHOLD_PERCENT: f64 = 100.0;

/// Цвет значения ROI: зелёный от 100% и выше.
pub(crate) fn roi_color(roi_percent: f64) -> &'static str {
    if roi_percent >= ROI_THRESHOLD_PERCENT {
        "#28a745"
    } else {
        "#dc3545"
    }
}

#[component]
pub fn ReportTable() -> impl IntoView {
    let state = use_dashboard();

    view! {
        <table id="roi-table" class="report-table">
            <thead>
                <tr>
                    {COLUMNS.into_iter().map(|title| view! { <th>{title}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>
                {move || {
                    let report = state.report.get();
                    if !report.loaded {
                        return ().into_any();
                    }
                    if report.records.is_empty() {
                        return view! {
                            <tr class="no-data">
                                <td colspan=COLUMNS.len()>
                                    "⚠️ Нет данных по выбранным кампаниям"
                                </td>
                            </tr>
                        }
                        .into_any();
                    }

                    let metric_label = report.metric.label();
                    let groups: Vec<(String, Vec<DailyRecord>)> = group_by_campaign(
                            &report.records,
                        )
                        .into_iter()
                        .map(|(id, rows)| (id, rows.into_iter().cloned().collect()))
                        .collect();

                    groups
                        .into_iter()
                        .enumerate()
                        .map(|(index, (campaign_id, rows))| {
                            let expanded = {
                                let id = campaign_id.clone();
                                move || state.accordion.with(|a| a.is_expanded(&id))
                            };
                            let on_header_click = {
                                let id = campaign_id.clone();
                                move |_| {
                                    state.accordion.update(|a| a.click(&id));
                                    let opened = state
                                        .accordion
                                        .with_untracked(|a| a.is_expanded(&id));
                                    log::info!(
                                        "Кампания {} {}",
                                        id,
                                        if opened { "раскрыта" } else { "свернута" }
                                    );
                                }
                            };
                            let header_class = {
                                let expanded = expanded.clone();
                                move || {
                                    if expanded() {
                                        "campaign-header active"
                                    } else {
                                        "campaign-header"
                                    }
                                }
                            };
                            let swatch_style = format!(
                                "border:2px solid {}; background:{};",
                                series_color(index),
                                series_fill(index),
                            );

                            view! {
                                <tr class=header_class on:click=on_header_click>
                                    <td colspan=COLUMNS.len() style="text-align:center">
                                        <span class="legend-icon" style=swatch_style></span>
                                        {format!(" Кампания {} — {}", campaign_id, metric_label)}
                                    </td>
                                </tr>
                                {rows
                                    .into_iter()
                                    .map(|row| {
                                        let visible = expanded.clone();
                                        view! {
                                            <tr
                                                class="campaign-row"
                                                style:display=move || {
                                                    if visible() { "" } else { "none" }
                                                }
                                            >
                                                <td>{row.date.clone()}</td>
                                                <td>{row.actions}</td>
                                                <td>{format!("{:.2}", row.reward)}</td>
                                                <td style:color=roi_color(row.roi_percent)>
                                                    {format!("{:.1}%", row.roi_percent)}
                                                </td>
                                                <td>{format!("{:.2}", row.row_cpa())}</td>
                                                <td>{format!("{:.2}", row.row_cpr())}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            }
                        })
                        .collect_view()
                        .into_any()
                }}
            </tbody>
        </table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_color_threshold_is_inclusive_at_100() {
        assert_eq!(roi_color(100.0), "#28a745");
        assert_eq!(roi_color(125.5), "#28a745");
        assert_eq!(roi_color(99.9), "#dc3545");
        assert_eq!(roi_color(0.0), "#dc3545");
    }
}
