//! Меню экспорта: Excel, PNG и Markdown с сервера, PDF из состояния страницы.

use contracts::analytics::rollup::{group_by_campaign, NO_DATA_REPORT};
use contracts::analytics::{Metric, PdfExportRequest, PdfRow};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::analytics::api::{self, ServerExport};
use crate::analytics::state::{use_dashboard, ReportData};
use crate::analytics::ui::close_on_outside_click;
use crate::analytics::ui::report_table::COLUMNS;
use crate::shared::export::download_text;
use crate::shared::toast::use_toast;

/// Markdown-отчёт собирается на клиенте из текста сводки.
pub(crate) fn build_markdown(metric: Metric, summary: &str) -> String {
    format!("# Отчёт по метрике {}\n\n{}\n", metric.label(), summary)
}

/// Собирает тело PDF-экспорта из состояния отчёта, не читая DOM.
///
/// Структура строк повторяет таблицу: заголовок колонок, затем на каждую
/// кампанию строка-заголовок и её дневные строки.
pub(crate) fn build_pdf_request(report: &ReportData, summary: &str) -> PdfExportRequest {
    let mut rows = vec![PdfRow {
        cells: COLUMNS.iter().map(|c| c.to_string()).collect(),
    }];
    let mut campaigns = Vec::new();

    for (campaign_id, records) in group_by_campaign(&report.records) {
        let mut header = vec![format!(
            "Кампания {} — {}",
            campaign_id,
            report.metric.label()
        )];
        header.resize(COLUMNS.len(), String::new());
        rows.push(PdfRow { cells: header });

        for record in records {
            rows.push(PdfRow {
                cells: vec![
                    record.date.clone(),
                    record.actions.to_string(),
                    format!("{:.2}", record.reward),
                    format!("{:.1}%", record.roi_percent),
                    format!("{:.2}", record.row_cpa()),
                    format!("{:.2}", record.row_cpr()),
                ],
            });
        }
        campaigns.push(campaign_id);
    }

    PdfExportRequest {
        metric: report.metric.as_str().to_string(),
        summary: summary.to_string(),
        rows,
        campaigns,
    }
}

#[component]
pub fn ExportMenu() -> impl IntoView {
    let state = use_dashboard();
    let toasts = use_toast();
    let open = RwSignal::new(false);

    // Закрытие по клику вне меню (как у остальных dropdown)
    close_on_outside_click(open);

    let export_server = move |kind: ServerExport, ok_message: &'static str| {
        open.set(false);
        let selection = state.filters.get_untracked();
        if let Err(err) = selection.validate() {
            toasts.show(format!("⚠️ {}", err));
            return;
        }
        spawn_local(async move {
            match api::export_artifact(kind, &selection).await {
                Ok(()) => toasts.show(ok_message),
                Err(err) => {
                    log::error!("Экспорт {:?} не выполнен: {}", kind, err);
                    toasts.show(match kind {
                        ServerExport::Excel => "⚠️ Ошибка экспорта Excel",
                        ServerExport::Png => "⚠️ Ошибка экспорта PNG",
                        ServerExport::Markdown => "⚠️ Ошибка экспорта Markdown",
                    });
                }
            }
        });
    };

    let export_markdown = move || {
        open.set(false);
        let summary = state.summary.get_untracked();
        if summary.trim().is_empty() || summary == NO_DATA_REPORT {
            toasts.show("⚠️ Отчёт пуст — примените фильтры");
            return;
        }
        let metric = state.report.with_untracked(|r| r.metric);
        let content = build_markdown(metric, &summary);
        match download_text(
            &content,
            "text/markdown",
            &format!("{}-report.md", metric.as_str()),
        ) {
            Ok(()) => toasts.show("📝 Markdown сохранён"),
            Err(err) => {
                log::error!("Markdown не сохранён: {}", err);
                toasts.show("⚠️ Ошибка экспорта Markdown");
            }
        }
    };

    let export_pdf = move || {
        open.set(false);
        let report = state.report.get_untracked();
        if !report.loaded || report.records.is_empty() {
            toasts.show("⚠️ Отчёт пуст — примените фильтры");
            return;
        }
        let summary = state.summary.get_untracked();
        let request = build_pdf_request(&report, &summary);
        spawn_local(async move {
            match api::export_pdf(&request).await {
                Ok(()) => toasts.show("📄 PDF сохранён"),
                Err(err) => {
                    log::error!("Экспорт PDF не выполнен: {}", err);
                    toasts.show("⚠️ Ошибка экспорта PDF");
                }
            }
        });
    };

    view! {
        <div class="dropdown" id="export-dropdown">
            <button
                class="dropdown-btn"
                on:click=move |ev| {
                    ev.stop_propagation();
                    open.update(|o| *o = !*o);
                }
            >
                "⬇ Экспорт ▾"
            </button>
            <Show when=move || open.get()>
                <div class="dropdown-menu" on:click=move |ev| ev.stop_propagation()>
                    <button
                        class="export-option"
                        on:click=move |_| export_server(
                            ServerExport::Excel,
                            "📊 Excel сохранён",
                        )
                    >
                        "Excel (.xlsx)"
                    </button>
                    <button
                        class="export-option"
                        on:click=move |_| export_server(ServerExport::Png, "🖼️ PNG сохранён")
                    >
                        "График (.png)"
                    </button>
                    <button class="export-option" on:click=move |_| export_markdown()>
                        "Markdown (.md)"
                    </button>
                    <button class="export-option" on:click=move |_| export_pdf()>
                        "PDF (.pdf)"
                    </button>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::analytics::DailyRecord;

    fn record(campaign: &str, date: &str, actions: u64) -> DailyRecord {
        DailyRecord {
            date: date.into(),
            campaign_id: Some(campaign.into()),
            actions,
            reward: actions as f64 * 5.0,
            roi_percent: 125.0,
        }
    }

    #[test]
    fn markdown_contains_metric_header_and_summary() {
        let md = build_markdown(Metric::Cpa, "• Кампания 7: CPA = 5.00 (10 действий)");
        assert!(md.starts_with("# Отчёт по метрике CPA\n\n"));
        assert!(md.contains("Кампания 7"));
    }

    #[test]
    fn pdf_request_starts_with_column_header_row() {
        let report = ReportData {
            records: vec![record("7", "2024-01-01", 10)],
            cost_per_action: 4.0,
            metric: Metric::Roi,
            loaded: true,
        };
        let request = build_pdf_request(&report, "сводка");
        assert_eq!(request.metric, "roi");
        assert_eq!(request.summary, "сводка");
        assert_eq!(request.rows[0].cells, COLUMNS.map(String::from).to_vec());
    }

    #[test]
    fn pdf_request_groups_campaign_header_before_its_days() {
        let report = ReportData {
            records: vec![
                record("7", "2024-01-01", 10),
                record("12", "2024-01-01", 4),
                record("7", "2024-01-02", 6),
            ],
            cost_per_action: 4.0,
            metric: Metric::Roi,
            loaded: true,
        };
        let request = build_pdf_request(&report, "");

        assert_eq!(request.campaigns, vec!["7", "12"]);
        // колонки + 2 заголовка кампаний + 3 дневные строки
        assert_eq!(request.rows.len(), 6);
        assert_eq!(request.rows[1].cells[0], "Кампания 7 — ROI %");
        assert_eq!(request.rows[1].cells.len(), COLUMNS.len());
        assert_eq!(request.rows[2].cells[0], "2024-01-01");
        assert_eq!(request.rows[3].cells[0], "2024-01-02");
        assert_eq!(request.rows[4].cells[0], "Кампания 12 — ROI %");
    }

    #[test]
    fn pdf_rows_format_matches_table_cells() {
        let report = ReportData {
            records: vec![record("7", "2024-01-01", 10)],
            cost_per_action: 4.0,
            metric: Metric::Roi,
            loaded: true,
        };
        let request = build_pdf_request(&report, "");
        let day = &request.rows[2].cells;
        assert_eq!(day[1], "10");
        assert_eq!(day[2], "50.00");
        assert_eq!(day[3], "125.0%");
        assert_eq!(day[4], "5.00");
        assert_eq!(day[5], "0.20");
    }
}
