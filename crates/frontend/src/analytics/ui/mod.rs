pub mod chart_canvas;
pub mod charts;
pub mod dashboard;
pub mod export_menu;
pub mod filter_bar;
pub mod report_table;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Закрывает dropdown по клику вне его (по образцу селектора темы).
///
/// Слушатель регистрируется один раз на компонент и живёт до конца
/// сессии; открытия и закрытия новых слушателей не добавляют.
pub(crate) fn close_on_outside_click(open: RwSignal<bool>) {
    let closure = Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
        if open.get_untracked() {
            open.set(false);
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(window) = web_sys::window() {
        let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget(); // Keep the closure alive
    }
}

/// Цвет ряда кампании: та же HSL-палитра у легенды таблицы и линий графиков.
pub(crate) fn series_color(index: usize) -> String {
    format!("hsl({}, 70%, 50%)", (index * 60) % 360)
}

/// Полупрозрачная заливка того же тона.
pub(crate) fn series_fill(index: usize) -> String {
    format!("hsla({}, 70%, 50%, 0.1)", (index * 60) % 360)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_steps_by_60_degrees_and_wraps() {
        assert_eq!(series_color(0), "hsl(0, 70%, 50%)");
        assert_eq!(series_color(1), "hsl(60, 70%, 50%)");
        assert_eq!(series_color(6), "hsl(0, 70%, 50%)");
    }
}
