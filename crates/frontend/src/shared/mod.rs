pub mod api_utils;
pub mod export;
pub mod theme;
pub mod toast;
