//! Агрегация дневных записей по кампаниям и текстовый отчёт.

use super::dto::{DailyRecord, Metric};

/// Свод по кампании: суммы дневных записей с одним campaign_id.
///
/// Пересчитывается при каждом рендере и никуда не сохраняется.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRollup {
    pub campaign_id: String,
    pub total_actions: u64,
    pub total_reward: f64,
    pub day_count: usize,
}

impl CampaignRollup {
    /// Агрегированный ROI: (reward/actions)/cost × 100, 0 при нуле действий.
    pub fn aggregate_roi(&self, cost_per_action: f64) -> f64 {
        if self.total_actions == 0 {
            return 0.0;
        }
        (self.total_reward / self.total_actions as f64) / cost_per_action * 100.0
    }

    /// Агрегированный CPA: reward/actions, 0 при нуле действий.
    pub fn aggregate_cpa(&self) -> f64 {
        if self.total_actions == 0 {
            return 0.0;
        }
        self.total_reward / self.total_actions as f64
    }

    /// CTR-прокси: (actions/days) × 100.
    ///
    /// Показы и клики в модели не представлены, поэтому это заведомо
    /// приближение "действий в день", а не настоящий click-through rate.
    pub fn aggregate_ctr(&self) -> f64 {
        if self.day_count == 0 {
            return 0.0;
        }
        (self.total_actions as f64 / self.day_count as f64) * 100.0
    }
}

/// Группирует записи по кампаниям в порядке первого появления.
pub fn group_by_campaign(records: &[DailyRecord]) -> Vec<(String, Vec<&DailyRecord>)> {
    let mut groups: Vec<(String, Vec<&DailyRecord>)> = Vec::new();
    for record in records {
        let key = record.campaign_key();
        match groups.iter_mut().find(|(id, _)| id == key) {
            Some((_, rows)) => rows.push(record),
            None => groups.push((key.to_string(), vec![record])),
        }
    }
    groups
}

/// Считает свод по каждой кампании (порядок — как в `group_by_campaign`).
pub fn rollups(records: &[DailyRecord]) -> Vec<CampaignRollup> {
    group_by_campaign(records)
        .into_iter()
        .map(|(campaign_id, rows)| CampaignRollup {
            campaign_id,
            total_actions: rows.iter().map(|r| r.actions).sum(),
            total_reward: rows.iter().map(|r| r.reward).sum(),
            day_count: rows.len(),
        })
        .collect()
}

/// Сообщение отчёта при отсутствии данных или некорректной стоимости.
pub const NO_DATA_REPORT: &str = "❌ Нет данных для отчёта.";

/// Текстовый отчёт: одна строка на кампанию для выбранной метрики.
///
/// При пустом входе или `cost_per_action <= 0` возвращает фиксированное
/// сообщение об отсутствии данных (fail closed).
pub fn generate_report(records: &[DailyRecord], cost_per_action: f64, metric: Metric) -> String {
    if records.is_empty() || cost_per_action <= 0.0 {
        return NO_DATA_REPORT.to_string();
    }

    let mut report = String::new();
    for rollup in rollups(records) {
        let line = match metric {
            Metric::Cpa => format!(
                "• Кампания {}: CPA = {:.2} ({} действий)\n",
                rollup.campaign_id,
                rollup.aggregate_cpa(),
                rollup.total_actions
            ),
            Metric::Ctr => format!(
                "• Кампания {}: CTR ≈ {:.1}% ({} дней)\n",
                rollup.campaign_id,
                rollup.aggregate_ctr(),
                rollup.day_count
            ),
            Metric::Roi => format!(
                "• Кампания {}: {} действий, Вознаграждение {:.2}, Агрегированный ROI ≈ {:.1}%\n",
                rollup.campaign_id,
                rollup.total_actions,
                rollup.total_reward,
                rollup.aggregate_roi(cost_per_action)
            ),
        };
        report.push_str(&line);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, campaign: &str, actions: u64, reward: f64, roi: f64) -> DailyRecord {
        DailyRecord {
            date: date.into(),
            campaign_id: Some(campaign.into()),
            actions,
            reward,
            roi_percent: roi,
        }
    }

    #[test]
    fn groups_preserve_first_occurrence_order() {
        let records = vec![
            record("2024-01-01", "12", 1, 1.0, 0.0),
            record("2024-01-01", "7", 2, 2.0, 0.0),
            record("2024-01-02", "12", 3, 3.0, 0.0),
        ];
        let groups = group_by_campaign(&records);
        let ids: Vec<&str> = groups.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["12", "7"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn records_without_id_fall_into_shared_bucket() {
        let mut orphan = record("2024-01-01", "x", 1, 1.0, 0.0);
        orphan.campaign_id = None;
        let records = [orphan];
        let groups = group_by_campaign(&records);
        assert_eq!(groups[0].0, Metric::NO_ID_BUCKET);
    }

    #[test]
    fn zero_actions_yield_zero_aggregates_not_nan() {
        let records = vec![
            record("2024-01-01", "7", 0, 0.0, 0.0),
            record("2024-01-02", "7", 0, 0.0, 0.0),
        ];
        let rollup = &rollups(&records)[0];
        assert_eq!(rollup.aggregate_roi(1.0), 0.0);
        assert_eq!(rollup.aggregate_cpa(), 0.0);
        assert!(rollup.aggregate_roi(1.0).is_finite());
    }

    #[test]
    fn roi_report_line_matches_expected_precision() {
        let records = vec![record("2024-01-01", "7", 10, 50.0, 125.0)];
        let report = generate_report(&records, 4.0, Metric::Roi);
        // (50 / 10) / 4 * 100 = 125.0
        assert_eq!(
            report,
            "• Кампания 7: 10 действий, Вознаграждение 50.00, Агрегированный ROI ≈ 125.0%\n"
        );
    }

    #[test]
    fn cpa_and_ctr_report_lines() {
        let records = vec![
            record("2024-01-01", "7", 10, 25.0, 0.0),
            record("2024-01-02", "7", 10, 15.0, 0.0),
        ];
        assert_eq!(
            generate_report(&records, 1.0, Metric::Cpa),
            "• Кампания 7: CPA = 2.00 (20 действий)\n"
        );
        // (20 / 2 дня) * 100 = 1000.0
        assert_eq!(
            generate_report(&records, 1.0, Metric::Ctr),
            "• Кампания 7: CTR ≈ 1000.0% (2 дней)\n"
        );
    }

    #[test]
    fn empty_input_and_bad_cost_fail_closed() {
        assert_eq!(generate_report(&[], 1.0, Metric::Roi), NO_DATA_REPORT);
        let records = vec![record("2024-01-01", "7", 1, 1.0, 0.0)];
        assert_eq!(generate_report(&records, 0.0, Metric::Roi), NO_DATA_REPORT);
        assert_eq!(generate_report(&records, -1.0, Metric::Roi), NO_DATA_REPORT);
    }
}
