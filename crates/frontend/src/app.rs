use leptos::prelude::*;

use crate::analytics::state::DashboardState;
use crate::analytics::ui::dashboard::DashboardPage;
use crate::shared::theme::ThemeProvider;
use crate::shared::toast::{ToastHost, ToastService};
use crate::system::auth;

#[component]
pub fn App() -> impl IntoView {
    // Всё разделяемое состояние дашборда живёт в одном контексте,
    // компоненты-рендереры читают его через сигналы.
    provide_context(DashboardState::new());
    provide_context(ToastService::new());

    // Вход из Telegram Mini App (вне Telegram — обычная сессия без токена)
    auth::init_telegram_session();

    view! {
        <ThemeProvider>
            <DashboardPage />
            <ToastHost />
        </ThemeProvider>
    }
}
