//! Транзиентные уведомления ("тосты") об исходе действий пользователя.
//!
//! Сообщение показывается две секунды и исчезает само; новое сообщение
//! вытесняет предыдущее, не дожидаясь его таймера.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

const TOAST_DURATION_MS: u32 = 2000;

/// Сервис уведомлений, доступный через контекст всему приложению.
#[derive(Clone, Copy)]
pub struct ToastService {
    message: RwSignal<Option<String>>,
    // Поколение сообщения: таймер старого сообщения не гасит новое
    generation: StoredValue<u64>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            message: RwSignal::new(None),
            generation: StoredValue::new(0),
        }
    }

    /// Показывает сообщение на две секунды.
    pub fn show(&self, message: impl Into<String>) {
        let text = message.into();
        log::info!("toast: {}", text);

        let current = self.generation.get_value() + 1;
        self.generation.set_value(current);
        self.message.set(Some(text));

        let message_signal = self.message;
        let generation = self.generation;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_DURATION_MS).await;
            if generation.get_value() == current {
                message_signal.set(None);
            }
        });
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook to use the toast service.
pub fn use_toast() -> ToastService {
    use_context::<ToastService>().expect("ToastService not found in context")
}

/// Контейнер тоста; монтируется один раз на всё приложение.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toast();
    let message = toasts.message;

    view! {
        <div
            id="toast"
            class=move || if message.get().is_some() { "toast show" } else { "toast" }
        >
            {move || message.get().unwrap_or_default()}
        </div>
    }
}
