//! Рендер-адаптер графиков: рисует чистое описание рядов на canvas 2D.
//!
//! Владеет жизненным циклом отрисовки: каждый вызов полностью очищает
//! canvas и рисует заново, экземпляры графиков нигде не накапливаются.

use contracts::analytics::{AxisSide, ChartView, MetricSeries};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::analytics::ui::series_color;

const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 44.0;
const MARGIN_TOP: f64 = 18.0;
const MARGIN_BOTTOM: f64 = 24.0;

/// Отображение значений на вертикальную позицию [0, 1] снизу вверх.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValueScale {
    min: f64,
    max: f64,
    logarithmic: bool,
}

impl ValueScale {
    /// Линейная шкала начинается от нуля; логарифмическая берёт только
    /// положительные значения (остальные прижимаются к низу оси).
    pub(crate) fn from_values<I>(values: I, logarithmic: bool) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        if logarithmic {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for v in values.into_iter().filter(|v| *v > 0.0) {
                min = min.min(v);
                max = max.max(v);
            }
            if !min.is_finite() || !max.is_finite() {
                return Self {
                    min: 0.1,
                    max: 1.0,
                    logarithmic: true,
                };
            }
            if min == max {
                max = min * 10.0;
            }
            Self {
                min,
                max,
                logarithmic: true,
            }
        } else {
            let mut max = f64::NEG_INFINITY;
            let mut min = 0.0_f64; // beginAtZero
            for v in values {
                max = max.max(v);
                min = min.min(v);
            }
            if !max.is_finite() {
                max = 1.0;
            }
            if max == min {
                max = min + 1.0;
            }
            Self {
                min,
                max,
                logarithmic: false,
            }
        }
    }

    /// Доля высоты оси для значения (0 = низ, 1 = верх).
    pub(crate) fn position(&self, value: f64) -> f64 {
        let t = if self.logarithmic {
            if value <= 0.0 {
                return 0.0;
            }
            (value.log10() - self.min.log10()) / (self.max.log10() - self.min.log10())
        } else {
            (value - self.min) / (self.max - self.min)
        };
        t.clamp(0.0, 1.0)
    }

    pub(crate) fn min(&self) -> f64 {
        self.min
    }

    pub(crate) fn max(&self) -> f64 {
        self.max
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|e| format!("Canvas context error: {:?}", e))?
        .ok_or_else(|| "Canvas context missing".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "Context cast failed".to_string())
}

/// Заглушка при отсутствии данных: очищенный canvas с центрированным текстом.
pub fn draw_placeholder(canvas: &HtmlCanvasElement, message: &str) -> Result<(), String> {
    let ctx = context_2d(canvas)?;
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_font("16px sans-serif");
    ctx.set_fill_style_str("gray");
    ctx.set_text_align("center");
    let _ = ctx.fill_text(message, width / 2.0, height / 2.0);

    log::info!("{}", message);
    Ok(())
}

/// Полная перерисовка графика метрики с учётом переключателей отображения.
pub fn draw(
    canvas: &HtmlCanvasElement,
    series: &MetricSeries,
    view: &ChartView,
) -> Result<(), String> {
    if series.is_empty() {
        return draw_placeholder(
            canvas,
            &format!("Нет данных для {}", series.metric.label()),
        );
    }

    let ctx = context_2d(canvas)?;
    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, width, height);

    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let point_count = series.labels.len();

    // Видимые значения каждого ряда и его ось
    let display: Vec<(AxisSide, Vec<Option<f64>>)> = series
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| (view.axis_for(i), ds.display_points(view)))
        .collect();

    let axis_values = |side: AxisSide| {
        display
            .iter()
            .filter(move |(s, _)| *s == side)
            .flat_map(|(_, points)| points.iter().flatten().copied())
            .collect::<Vec<f64>>()
    };

    let left_scale = ValueScale::from_values(axis_values(AxisSide::Left), view.logarithmic);
    let right_scale = if view.dual_axis {
        Some(ValueScale::from_values(
            axis_values(AxisSide::Right),
            view.logarithmic,
        ))
    } else {
        None
    };

    let x_at = |index: usize| {
        if point_count <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * index as f64 / (point_count - 1) as f64
        }
    };
    let y_at = |scale: &ValueScale, value: f64| MARGIN_TOP + plot_h * (1.0 - scale.position(value));

    // Оси
    ctx.set_stroke_style_str("#999");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(MARGIN_LEFT, MARGIN_TOP);
    ctx.line_to(MARGIN_LEFT, MARGIN_TOP + plot_h);
    ctx.line_to(MARGIN_LEFT + plot_w, MARGIN_TOP + plot_h);
    if right_scale.is_some() {
        ctx.move_to(MARGIN_LEFT + plot_w, MARGIN_TOP);
        ctx.line_to(MARGIN_LEFT + plot_w, MARGIN_TOP + plot_h);
    }
    ctx.stroke();

    // Подписи осей: границы значений и крайние даты
    ctx.set_font("10px sans-serif");
    ctx.set_fill_style_str("#777");
    ctx.set_text_align("right");
    let _ = ctx.fill_text(
        &format!("{:.1}", left_scale.max()),
        MARGIN_LEFT - 4.0,
        MARGIN_TOP + 8.0,
    );
    let _ = ctx.fill_text(
        &format!("{:.1}", left_scale.min()),
        MARGIN_LEFT - 4.0,
        MARGIN_TOP + plot_h,
    );
    if let Some(scale) = &right_scale {
        ctx.set_text_align("left");
        let _ = ctx.fill_text(
            &format!("{:.1}", scale.max()),
            MARGIN_LEFT + plot_w + 4.0,
            MARGIN_TOP + 8.0,
        );
        let _ = ctx.fill_text(
            &format!("{:.1}", scale.min()),
            MARGIN_LEFT + plot_w + 4.0,
            MARGIN_TOP + plot_h,
        );
    }
    ctx.set_text_align("left");
    if let Some(first) = series.labels.first() {
        let _ = ctx.fill_text(first, MARGIN_LEFT, height - 8.0);
    }
    if point_count > 1 {
        if let Some(last) = series.labels.last() {
            ctx.set_text_align("right");
            let _ = ctx.fill_text(last, MARGIN_LEFT + plot_w, height - 8.0);
        }
    }

    // Ряды: разрывы не интерполируются нулём, но соседние существующие
    // точки соединяются отрезком через разрыв (поведение spanGaps)
    for (index, (side, points)) in display.iter().enumerate() {
        let scale = match side {
            AxisSide::Left => &left_scale,
            AxisSide::Right => right_scale.as_ref().unwrap_or(&left_scale),
        };

        ctx.set_stroke_style_str(&series_color(index));
        ctx.set_line_width(1.0);
        ctx.begin_path();
        let mut started = false;
        for (i, point) in points.iter().enumerate() {
            if let Some(value) = point {
                let (px, py) = (x_at(i), y_at(scale, *value));
                if started {
                    ctx.line_to(px, py);
                } else {
                    ctx.move_to(px, py);
                    started = true;
                }
            }
        }
        ctx.stroke();

        // Легенда
        ctx.set_fill_style_str(&series_color(index));
        let _ = ctx.fill_text(
            &format!("Кампания {}", series.datasets[index].campaign_id),
            MARGIN_LEFT + index as f64 * 110.0,
            12.0,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_begins_at_zero() {
        let scale = ValueScale::from_values([50.0, 100.0], false);
        assert_eq!(scale.min(), 0.0);
        assert_eq!(scale.max(), 100.0);
        assert_eq!(scale.position(0.0), 0.0);
        assert_eq!(scale.position(100.0), 1.0);
        assert_eq!(scale.position(50.0), 0.5);
    }

    #[test]
    fn linear_scale_extends_below_zero_for_negative_values() {
        let scale = ValueScale::from_values([-20.0, 80.0], false);
        assert_eq!(scale.min(), -20.0);
        assert_eq!(scale.position(-20.0), 0.0);
    }

    #[test]
    fn degenerate_inputs_do_not_divide_by_zero() {
        let scale = ValueScale::from_values([5.0], false);
        assert!(scale.position(5.0).is_finite());

        let empty = ValueScale::from_values(std::iter::empty(), false);
        assert!(empty.position(0.5).is_finite());
    }

    #[test]
    fn log_scale_is_monotonic_over_positive_values() {
        let scale = ValueScale::from_values([1.0, 10.0, 100.0], true);
        assert_eq!(scale.position(1.0), 0.0);
        assert_eq!(scale.position(100.0), 1.0);
        assert!((scale.position(10.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn log_scale_pins_non_positive_values_to_axis_bottom() {
        let scale = ValueScale::from_values([1.0, 100.0], true);
        assert_eq!(scale.position(0.0), 0.0);
        assert_eq!(scale.position(-5.0), 0.0);
    }

    #[test]
    fn log_scale_without_positive_values_falls_back() {
        let scale = ValueScale::from_values([0.0, -1.0], true);
        assert!(scale.position(0.5).is_finite());
    }
}
