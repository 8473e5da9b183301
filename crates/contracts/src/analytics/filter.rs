use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dto::Metric;

/// Текущий выбор фильтров отчёта.
///
/// Сериализованная форма совместима с blob'ом, который исходное
/// веб-приложение хранило в localStorage под ключом `filters`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterSelection {
    /// Дата начала периода, YYYY-MM-DD
    #[serde(rename = "start")]
    pub start_date: String,
    /// Дата конца периода, YYYY-MM-DD
    #[serde(rename = "end")]
    pub end_date: String,
    #[serde(rename = "campaigns")]
    pub campaign_ids: Vec<String>,
    /// Стоимость одного действия (строка из поля ввода)
    #[serde(rename = "cpa")]
    pub cost_per_action: String,
    #[serde(default)]
    pub metric: Metric,
}

/// Ошибка валидации фильтров: отчёт не запрашивается, пока все поля не заполнены.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Заполните все поля перед отправкой: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },
    #[error("Стоимость действия должна быть положительным числом")]
    NonPositiveCost,
    #[error("Дата начала позже даты окончания")]
    ReversedRange,
}

impl ValidationError {
    /// Затронутые поля (для подсветки инпутов в UI).
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingFields { fields } => {
                fields.iter().map(String::as_str).collect()
            }
            ValidationError::NonPositiveCost => vec!["cost-per-action"],
            ValidationError::ReversedRange => vec!["start-date", "end-date"],
        }
    }
}

impl FilterSelection {
    /// Разобранная стоимость действия; `None`, если поле пустое или не число.
    pub fn cost(&self) -> Option<f64> {
        self.cost_per_action.trim().parse::<f64>().ok()
    }

    /// Проверяет, что выбор полон и согласован.
    ///
    /// Пустые поля собираются в один `MissingFields`, чтобы UI подсветил
    /// всё сразу. Перевёрнутый диапазон дат отклоняется здесь, а не на
    /// бэкенде.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.start_date.trim().is_empty() {
            missing.push("start-date".to_string());
        }
        if self.end_date.trim().is_empty() {
            missing.push("end-date".to_string());
        }
        if self.cost_per_action.trim().is_empty() {
            missing.push("cost-per-action".to_string());
        }
        if self.campaign_ids.is_empty() {
            missing.push("campaigns".to_string());
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        match self.cost() {
            Some(cost) if cost > 0.0 => {}
            _ => return Err(ValidationError::NonPositiveCost),
        }

        if let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d"),
            NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d"),
        ) {
            if start > end {
                return Err(ValidationError::ReversedRange);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FilterSelection {
        FilterSelection {
            start_date: "2024-01-01".into(),
            end_date: "2024-01-31".into(),
            campaign_ids: vec!["7".into(), "12".into()],
            cost_per_action: "1.5".into(),
            metric: Metric::Roi,
        }
    }

    #[test]
    fn complete_selection_is_valid() {
        assert_eq!(complete().validate(), Ok(()));
    }

    #[test]
    fn each_cleared_field_is_rejected() {
        let mut s = complete();
        s.start_date.clear();
        assert!(matches!(
            s.validate(),
            Err(ValidationError::MissingFields { .. })
        ));

        let mut s = complete();
        s.end_date.clear();
        assert!(s.validate().is_err());

        let mut s = complete();
        s.campaign_ids.clear();
        assert!(s.validate().is_err());

        let mut s = complete();
        s.cost_per_action.clear();
        assert!(s.validate().is_err());
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let err = FilterSelection::default().validate().unwrap_err();
        match err {
            ValidationError::MissingFields { fields } => assert_eq!(fields.len(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_positive_cost_is_rejected() {
        let mut s = complete();
        s.cost_per_action = "0".into();
        assert_eq!(s.validate(), Err(ValidationError::NonPositiveCost));

        s.cost_per_action = "-2".into();
        assert_eq!(s.validate(), Err(ValidationError::NonPositiveCost));

        s.cost_per_action = "abc".into();
        assert_eq!(s.validate(), Err(ValidationError::NonPositiveCost));
    }

    #[test]
    fn reversed_date_range_is_rejected() {
        let mut s = complete();
        s.start_date = "2024-02-01".into();
        s.end_date = "2024-01-01".into();
        assert_eq!(s.validate(), Err(ValidationError::ReversedRange));
    }

    #[test]
    fn storage_blob_round_trip() {
        let s = complete();
        let json = serde_json::to_string(&s).unwrap();
        // Совместимость с форматом localStorage исходного приложения
        assert!(json.contains("\"start\""));
        assert!(json.contains("\"campaigns\""));
        let back: FilterSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn blob_without_metric_defaults_to_roi() {
        let json = r#"{"start":"2024-01-01","end":"2024-01-02","campaigns":["7"],"cpa":"1"}"#;
        let s: FilterSelection = serde_json::from_str(json).unwrap();
        assert_eq!(s.metric, Metric::Roi);
    }
}
