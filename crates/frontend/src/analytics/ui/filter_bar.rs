//! Панель фильтров: период, стоимость действия, кампании, метрика.

use contracts::analytics::Metric;
use leptos::prelude::*;
use thaw::*;

use crate::analytics::state::use_dashboard;
use crate::analytics::ui::close_on_outside_click;

/// Кампании, доступные в выпадающем списке (фиксированный набор,
/// как в разметке исходного приложения).
pub const CAMPAIGN_OPTIONS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];

#[component]
pub fn FilterBar(on_apply: Callback<()>, on_clear: Callback<()>) -> impl IntoView {
    let state = use_dashboard();
    let filters = state.filters;

    let campaigns_open = RwSignal::new(false);
    let metric_open = RwSignal::new(false);
    close_on_outside_click(campaigns_open);
    close_on_outside_click(metric_open);

    // Подсветка незаполненных полей после громкой валидации
    let has_error = move |field: &'static str| {
        state
            .validation_error
            .get()
            .map(|err| err.fields().contains(&field))
            .unwrap_or(false)
    };
    let input_class = move |field: &'static str| {
        if has_error(field) {
            "filter-input error"
        } else {
            "filter-input"
        }
    };

    let campaigns_label = move || {
        let count = filters.with(|f| f.campaign_ids.len());
        if count > 0 {
            format!("Выбрано: {} ▾", count)
        } else {
            "Выбрать кампании ▾".to_string()
        }
    };

    let toggle_campaign = move |id: &str| {
        let id = id.to_string();
        filters.update(|f| {
            if let Some(pos) = f.campaign_ids.iter().position(|c| *c == id) {
                f.campaign_ids.remove(pos);
            } else {
                f.campaign_ids.push(id);
            }
        });
        log::info!(
            "Выбраны кампании: {}",
            filters.with_untracked(|f| f.campaign_ids.join(", "))
        );
    };

    view! {
        <div class="filter-panel">
            <Flex align=FlexAlign::End gap=FlexGap::Medium>
                <Flex vertical=true gap=FlexGap::Small>
                    <Label>"Период"</Label>
                    <Flex align=FlexAlign::Center gap=FlexGap::Small>
                        <input
                            type="date"
                            id="start-date"
                            class=move || input_class("start-date")
                            prop:value=move || filters.with(|f| f.start_date.clone())
                            on:input=move |ev| {
                                filters.update(|f| f.start_date = event_target_value(&ev));
                            }
                        />
                        <div>"—"</div>
                        <input
                            type="date"
                            id="end-date"
                            class=move || input_class("end-date")
                            prop:value=move || filters.with(|f| f.end_date.clone())
                            on:input=move |ev| {
                                filters.update(|f| f.end_date = event_target_value(&ev));
                            }
                        />
                    </Flex>
                </Flex>

                <Flex vertical=true gap=FlexGap::Small>
                    <Label>"Стоимость действия"</Label>
                    <input
                        type="number"
                        id="cost-per-action"
                        min="0"
                        step="0.01"
                        class=move || input_class("cost-per-action")
                        prop:value=move || filters.with(|f| f.cost_per_action.clone())
                        on:input=move |ev| {
                            filters.update(|f| f.cost_per_action = event_target_value(&ev));
                        }
                    />
                </Flex>

                <div class="dropdown" id="campaign-dropdown">
                    <button
                        class=move || {
                            if has_error("campaigns") {
                                "dropdown-btn error"
                            } else {
                                "dropdown-btn"
                            }
                        }
                        on:click=move |ev| {
                            ev.stop_propagation();
                            campaigns_open.update(|open| *open = !*open);
                        }
                    >
                        {campaigns_label}
                    </button>
                    <Show when=move || campaigns_open.get()>
                        <div class="dropdown-menu" on:click=move |ev| ev.stop_propagation()>
                            {CAMPAIGN_OPTIONS
                                .into_iter()
                                .map(|id| {
                                    let selected = move || {
                                        filters.with(|f| f.campaign_ids.iter().any(|c| c == id))
                                    };
                                    view! {
                                        <button
                                            class=move || {
                                                if selected() {
                                                    "campaign-toggle active"
                                                } else {
                                                    "campaign-toggle"
                                                }
                                            }
                                            on:click=move |_| toggle_campaign(id)
                                        >
                                            {format!("Кампания {}", id)}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </Show>
                </div>

                <div class="dropdown" id="metric-dropdown">
                    <button
                        class="dropdown-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            metric_open.update(|open| *open = !*open);
                        }
                    >
                        {move || format!("{} ▾", filters.with(|f| f.metric.label()))}
                    </button>
                    <Show when=move || metric_open.get()>
                        <div class="dropdown-menu">
                            {Metric::all()
                                .into_iter()
                                .map(|metric| {
                                    view! {
                                        <button
                                            class="metric-option"
                                            on:click=move |_| {
                                                filters.update(|f| f.metric = metric);
                                                metric_open.set(false);
                                                log::info!("Выбрана метрика: {}", metric.as_str());
                                            }
                                        >
                                            {metric.label()}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </Show>
                </div>

                <ButtonGroup>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| on_apply.run(())
                    >
                        "Показать"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| on_clear.run(())
                    >
                        "Очистить"
                    </Button>
                </ButtonGroup>
            </Flex>
        </div>
    }
}
