//! Построение временных рядов для графиков и чистые view-преобразования.
//!
//! Модуль описывает график как данные (ряды + флаги отображения); владение
//! canvas'ом и сам цикл отрисовки — забота рендер-адаптера во frontend.

use super::dto::{DailyRecord, Metric};
use super::rollup::group_by_campaign;

/// Ряд одной кампании: значение на каждую дату общей оси, `None` = разрыв.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDataset {
    pub campaign_id: String,
    /// Исходные (неотмасштабированные) значения; сохраняются при любых
    /// переключениях, чтобы выключение нормализации их восстанавливало.
    pub points: Vec<Option<f64>>,
}

impl SeriesDataset {
    /// Значения, отмасштабированные собственным максимумом по модулю
    /// в [0, 1]. Нулевой максимум даёт нулевой ряд, разрывы остаются.
    pub fn normalized_points(&self) -> Vec<Option<f64>> {
        let max = self
            .points
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        self.points
            .iter()
            .map(|p| p.map(|v| if max > 0.0 { v / max } else { 0.0 }))
            .collect()
    }

    /// Точки для отображения с учётом текущего состояния переключателей.
    pub fn display_points(&self, view: &ChartView) -> Vec<Option<f64>> {
        if view.normalized {
            self.normalized_points()
        } else {
            self.points.clone()
        }
    }
}

/// Временные ряды одной метрики по всем выбранным кампаниям.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    /// Отсортированное объединение всех дат по всем кампаниям.
    pub labels: Vec<String>,
    pub datasets: Vec<SeriesDataset>,
}

impl MetricSeries {
    /// Строит ряды: ось X — объединение дат, по ряду на кампанию,
    /// отсутствующая пара (кампания, дата) — разрыв, а не ноль.
    ///
    /// Значения: roi — присланный `roi_percent`; cpa — reward/actions с
    /// защитой от деления на ноль; ctr — "сырые" дневные действия (текстовый
    /// агрегат, в отличие от графика, показывает процент действий в день).
    pub fn build(records: &[DailyRecord], metric: Metric) -> Self {
        let mut labels: Vec<String> = records.iter().map(|r| r.date.clone()).collect();
        labels.sort();
        labels.dedup();

        let datasets = group_by_campaign(records)
            .into_iter()
            .map(|(campaign_id, rows)| {
                let points = labels
                    .iter()
                    .map(|date| {
                        rows.iter().find(|r| &r.date == date).map(|row| match metric {
                            Metric::Roi => row.roi_percent,
                            Metric::Cpa => row.row_cpa(),
                            Metric::Ctr => row.actions as f64,
                        })
                    })
                    .collect();
                SeriesDataset {
                    campaign_id,
                    points,
                }
            })
            .collect();

        Self {
            metric,
            labels,
            datasets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.is_empty()
    }
}

/// Сторона оси Y для ряда.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

/// Состояние локальных переключателей графика одной метрики.
///
/// Живёт в течение сессии страницы (не переживает перезагрузку);
/// каждый флаг независим и идемпотентен.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartView {
    /// Логарифмическая шкала Y — только тип оси, значения не трогаются.
    pub logarithmic: bool,
    /// Нормализация каждого ряда собственным максимумом.
    pub normalized: bool,
    /// Чётные ряды на левую ось, нечётные на правую.
    pub dual_axis: bool,
}

impl ChartView {
    /// Ось для ряда с данным индексом при текущем состоянии dual-axis.
    pub fn axis_for(&self, dataset_index: usize) -> AxisSide {
        if self.dual_axis && dataset_index % 2 == 1 {
            AxisSide::Right
        } else {
            AxisSide::Left
        }
    }
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
    fn labels_are_sorted_union_of_disjoint_date_sets() {
        let records = vec![
            record("2024-01-03", "7", 1, 1.0, 10.0),
            record("2024-01-01", "7", 1, 1.0, 10.0),
            record("2024-01-02", "12", 1, 1.0, 20.0),
        ];
        let series = MetricSeries::build(&records, Metric::Roi);
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

        // Кампания 7: разрыв на 2024-01-02, кампания 12 — на остальных датах
        assert_eq!(
            series.datasets[0].points,
            vec![Some(10.0), None, Some(10.0)]
        );
        assert_eq!(series.datasets[1].points, vec![None, Some(20.0), None]);
    }

    #[test]
    fn cpa_points_are_zero_guarded() {
        let records = vec![
            record("2024-01-01", "7", 0, 5.0, 0.0),
            record("2024-01-02", "7", 10, 5.0, 0.0),
        ];
        let series = MetricSeries::build(&records, Metric::Cpa);
        assert_eq!(series.datasets[0].points, vec![Some(0.0), Some(0.5)]);
    }

    #[test]
    fn ctr_series_plots_raw_actions() {
        let records = vec![record("2024-01-01", "7", 42, 5.0, 0.0)];
        let series = MetricSeries::build(&records, Metric::Ctr);
        assert_eq!(series.datasets[0].points, vec![Some(42.0)]);
    }

    #[test]
    fn normalization_scales_by_own_max_and_keeps_gaps() {
        let dataset = SeriesDataset {
            campaign_id: "7".into(),
            points: vec![Some(50.0), None, Some(100.0), Some(-25.0)],
        };
        assert_eq!(
            dataset.normalized_points(),
            vec![Some(0.5), None, Some(1.0), Some(-0.25)]
        );
    }

    #[test]
    fn normalization_of_all_zero_series_stays_zero() {
        let dataset = SeriesDataset {
            campaign_id: "7".into(),
            points: vec![Some(0.0), Some(0.0)],
        };
        assert_eq!(dataset.normalized_points(), vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn toggling_normalization_off_restores_original_points() {
        let dataset = SeriesDataset {
            campaign_id: "7".into(),
            points: vec![Some(10.0), Some(20.0)],
        };
        let mut view = ChartView::default();
        view.normalized = true;
        let _scaled = dataset.display_points(&view);
        view.normalized = false;
        assert_eq!(dataset.display_points(&view), dataset.points);
    }

    #[test]
    fn dual_axis_alternates_sides_and_collapses_back() {
        let dual = ChartView {
            dual_axis: true,
            ..Default::default()
        };
        assert_eq!(dual.axis_for(0), AxisSide::Left);
        assert_eq!(dual.axis_for(1), AxisSide::Right);
        assert_eq!(dual.axis_for(2), AxisSide::Left);

        let single = ChartView::default();
        assert_eq!(single.axis_for(1), AxisSide::Left);
    }

    #[test]
    fn empty_records_build_empty_series() {
        let series = MetricSeries::build(&[], Metric::Roi);
        assert!(series.is_empty());
    }
}
