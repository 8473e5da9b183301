use serde::{Deserialize, Serialize};

/// Одна запись (кампания, день) из `GET /analytics/roi/daily`.
///
/// Бэкенд может не заполнять `campaign_id` — клиент подставляет id кампании,
/// для которой делался запрос. После получения запись не изменяется.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    /// Дата в формате YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub campaign_id: Option<String>,
    pub actions: u64,
    pub reward: f64,
    pub roi_percent: f64,
}

impl DailyRecord {
    /// Ключ группировки: кампания либо служебная корзина для записей без id.
    pub fn campaign_key(&self) -> &str {
        self.campaign_id.as_deref().unwrap_or(Metric::NO_ID_BUCKET)
    }

    /// CPA строки таблицы: вознаграждение на действие, 0 при нуле действий.
    pub fn row_cpa(&self) -> f64 {
        if self.actions > 0 {
            self.reward / self.actions as f64
        } else {
            0.0
        }
    }

    /// Обратное отношение (действий на единицу вознаграждения), 0-guarded.
    pub fn row_cpr(&self) -> f64 {
        if self.reward > 0.0 {
            self.actions as f64 / self.reward
        } else {
            0.0
        }
    }
}

/// Активная метрика отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Roi,
    Cpa,
    Ctr,
}

impl Metric {
    /// Корзина для записей без campaign_id (как в исходном веб-приложении).
    pub const NO_ID_BUCKET: &'static str = "Без ID";

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Roi => "roi",
            Metric::Cpa => "cpa",
            Metric::Ctr => "ctr",
        }
    }

    /// Подпись метрики для заголовков таблицы и легенды графика.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Roi => "ROI %",
            Metric::Cpa => "CPA",
            Metric::Ctr => "CTR %",
        }
    }

    /// Неизвестное значение трактуется как ROI (метрика по умолчанию).
    pub fn from_str(s: &str) -> Self {
        match s {
            "cpa" => Metric::Cpa,
            "ctr" => Metric::Ctr,
            _ => Metric::Roi,
        }
    }

    pub fn all() -> [Metric; 3] {
        [Metric::Roi, Metric::Cpa, Metric::Ctr]
    }
}

/// Тело `POST /export/pdf`: текущий отчёт как текст плюс строки таблицы.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfExportRequest {
    pub metric: String,
    pub summary: String,
    pub rows: Vec<PdfRow>,
    pub campaigns: Vec<String>,
}

/// Строка таблицы в PDF-отчёте.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfRow {
    pub cells: Vec<String>,
}

/// Запрос `POST /auth/telegram` (вход из Telegram Mini App).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramAuthRequest {
    pub init_data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramAuthResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_record_defaults_missing_campaign_id() {
        let json = r#"{"date":"2024-01-01","actions":10,"reward":50.0,"roi_percent":125.0}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.campaign_id, None);
        assert_eq!(record.campaign_key(), "Без ID");
    }

    #[test]
    fn row_level_ratios_are_zero_guarded() {
        let record = DailyRecord {
            date: "2024-01-01".into(),
            campaign_id: Some("7".into()),
            actions: 0,
            reward: 0.0,
            roi_percent: 0.0,
        };
        assert_eq!(record.row_cpa(), 0.0);
        assert_eq!(record.row_cpr(), 0.0);
    }

    #[test]
    fn metric_round_trip_and_fallback() {
        for metric in Metric::all() {
            assert_eq!(Metric::from_str(metric.as_str()), metric);
        }
        assert_eq!(Metric::from_str("unknown"), Metric::Roi);
    }

    #[test]
    fn metric_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Metric::Ctr).unwrap(), "\"ctr\"");
    }
}
