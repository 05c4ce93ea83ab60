use axum::response::Redirect;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlashData {
    pub kind: String,
    pub message: String,
}

const FLASH_COOKIE_NAME: &str = "_flash";

/// Reads and consumes the flash cookie, if any.
pub fn get_flash(cookies: &Cookies) -> Option<FlashData> {
    let value = cookies
        .get(FLASH_COOKIE_NAME)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok());

    if value.is_some() {
        let mut removal = Cookie::new(FLASH_COOKIE_NAME, "");
        removal.set_path("/");
        cookies.remove(removal);
    }

    value
}

/// Sets a flash cookie and redirects (303) to `location`.
pub fn flash_redirect(cookies: &Cookies, location: &str, kind: &str, message: &str) -> Redirect {
    let data = FlashData {
        kind: kind.to_string(),
        message: message.to_string(),
    };

    if let Ok(json) = serde_json::to_string(&data) {
        let mut cookie = Cookie::new(FLASH_COOKIE_NAME, json);
        cookie.set_path("/");
        cookies.add(cookie);
    }

    Redirect::to(location)
}
