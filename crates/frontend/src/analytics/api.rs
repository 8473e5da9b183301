//! Клиент аналитического API: параллельная загрузка отчёта по кампаниям
//! и запросы серверных экспортов.

use contracts::analytics::{DailyRecord, FilterSelection, Metric, PdfExportRequest};
use futures::future::join_all;
use gloo_net::http::{Request, RequestBuilder};

use crate::shared::api_utils::api_url;
use crate::shared::export;
use crate::system::auth;

/// Добавляет bearer-токен Telegram-сессии, если он сохранён.
fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match auth::storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Загружает дневные записи по всем выбранным кампаниям параллельно.
///
/// Отказ отдельного запроса деградирует до пустого вклада этой кампании и
/// не прерывает остальные. Порядок результата: порядок кампаний в выборе,
/// внутри кампании — порядок сервера. Пустой результат означает состояние
/// "нет данных", решает об этом вызывающая сторона.
pub async fn fetch_report(selection: &FilterSelection) -> Vec<DailyRecord> {
    let requests = selection
        .campaign_ids
        .iter()
        .map(|id| fetch_campaign_daily(selection, id.clone()));

    join_all(requests).await.into_iter().flatten().collect()
}

async fn fetch_campaign_daily(
    selection: &FilterSelection,
    campaign_id: String,
) -> Vec<DailyRecord> {
    let url = api_url(&format!(
        "/analytics/roi/daily?start_date={}&end_date={}&cost_per_action={}&campaign_id={}",
        urlencoding::encode(&selection.start_date),
        urlencoding::encode(&selection.end_date),
        urlencoding::encode(&selection.cost_per_action),
        urlencoding::encode(&campaign_id),
    ));

    let response = match authorized(Request::get(&url)).send().await {
        Ok(response) => response,
        Err(err) => {
            log::error!("Запрос по кампании {} не отправлен: {}", campaign_id, err);
            return Vec::new();
        }
    };

    if !response.ok() {
        log::error!(
            "API вернул статус {} для кампании {}",
            response.status(),
            campaign_id
        );
        return Vec::new();
    }

    match response.json::<Vec<DailyRecord>>().await {
        Ok(mut records) => {
            // Бэкенд может не проставлять campaign_id — подставляем id запроса
            for record in &mut records {
                if record.campaign_id.is_none() {
                    record.campaign_id = Some(campaign_id.clone());
                }
            }
            records
        }
        Err(err) => {
            log::error!("Ответ по кампании {} не разобран: {}", campaign_id, err);
            Vec::new()
        }
    }
}

/// Серверные экспортные артефакты.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerExport {
    Excel,
    Png,
    Markdown,
}

impl ServerExport {
    fn path(&self) -> &'static str {
        match self {
            ServerExport::Excel => "excel",
            ServerExport::Png => "png",
            ServerExport::Markdown => "md",
        }
    }

    fn mime(&self) -> &'static str {
        match self {
            ServerExport::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ServerExport::Png => "image/png",
            ServerExport::Markdown => "text/markdown",
        }
    }

    /// Имя скачиваемого файла (как в исходном приложении).
    fn filename(&self, metric: Metric) -> String {
        match self {
            ServerExport::Excel => format!("{}-report.xlsx", metric.as_str()),
            ServerExport::Png => format!("{}-plot.png", metric.as_str()),
            ServerExport::Markdown => format!("{}-report.md", metric.as_str()),
        }
    }
}

/// Запрашивает серверный артефакт и инициирует его скачивание.
///
/// Неуспешный ответ — терминальный исход попытки: ошибка возвращается
/// вызывающему для показа уведомления, повторов нет.
pub async fn export_artifact(
    kind: ServerExport,
    selection: &FilterSelection,
) -> Result<(), String> {
    let mut query = format!(
        "metric={}&start_date={}&end_date={}",
        selection.metric.as_str(),
        urlencoding::encode(&selection.start_date),
        urlencoding::encode(&selection.end_date),
    );
    for id in &selection.campaign_ids {
        query.push_str("&campaign_id=");
        query.push_str(&urlencoding::encode(id));
    }

    let url = api_url(&format!("/analytics/export/{}?{}", kind.path(), query));

    let response = authorized(Request::get(&url))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Failed to read artifact: {}", e))?;

    export::download_bytes(&bytes, kind.mime(), &kind.filename(selection.metric))
}

/// Отправляет текущее состояние отчёта на сервер и скачивает готовый PDF.
pub async fn export_pdf(request: &PdfExportRequest) -> Result<(), String> {
    let response = authorized(Request::post(&api_url("/export/pdf")))
        .header("Content-Type", "application/json; charset=utf-8")
        .json(request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Failed to read artifact: {}", e))?;

    export::download_bytes(
        &bytes,
        "application/pdf",
        &format!("{}-report.pdf", request.metric),
    )
}
