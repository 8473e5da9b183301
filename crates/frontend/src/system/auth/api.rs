use contracts::analytics::dto::{TelegramAuthRequest, TelegramAuthResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Login with Telegram Mini App init data
pub async fn login_telegram(init_data: String) -> Result<TelegramAuthResponse, String> {
    let request = TelegramAuthRequest { init_data };

    let response = Request::post(&api_url("/auth/telegram"))
        .json(&request)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Auth failed: {}", response.status()));
    }

    response
        .json::<TelegramAuthResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
