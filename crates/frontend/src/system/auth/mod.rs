//! Авторизация при запуске внутри Telegram Mini App.
//!
//! Вне Telegram глобальный объект `Telegram.WebApp` отсутствует — это
//! обычная сессия без токена, все запросы идут без заголовка Authorization.

pub mod api;
pub mod storage;

use leptos::task::spawn_local;
use wasm_bindgen::JsValue;

/// Читает `window.Telegram.WebApp.initData`, если страница встроена в Telegram.
fn telegram_init_data() -> Option<String> {
    let window = web_sys::window()?;
    let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
    if telegram.is_undefined() {
        return None;
    }
    let webapp = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
    let init_data = js_sys::Reflect::get(&webapp, &JsValue::from_str("initData")).ok()?;
    init_data.as_string().filter(|s| !s.is_empty())
}

/// Обменивает init_data на access-токен и сохраняет его.
///
/// Неуспех логируется и не фатален: дашборд продолжает работать, бэкенд
/// сам отклонит запросы, требующие авторизации.
pub fn init_telegram_session() {
    let Some(init_data) = telegram_init_data() else {
        log::debug!("Telegram.WebApp.initData отсутствует — обычная сессия");
        return;
    };

    spawn_local(async move {
        match api::login_telegram(init_data).await {
            Ok(response) => {
                storage::save_access_token(&response.access_token);
                log::info!("Telegram-сессия авторизована");
            }
            Err(err) => {
                log::error!("Авторизация Telegram не удалась: {}", err);
            }
        }
    });
}
