//! Same-origin JSON fetches.
use dash_core::error::FetchError;
use dash_core::history::HistoryPage;
use dash_core::status::Status;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn transport(e: JsValue) -> FetchError {
    FetchError::Transport(format!("{:?}", e))
}

/// `GET path` with `Accept: application/json`; non-2xx is an error.
pub async fn fetch_text(path: &str) -> Result<String, FetchError> {
    let window = web::window().ok_or_else(|| FetchError::Transport("no window".into()))?;

    let headers = web::Headers::new().map_err(transport)?;
    headers.set("Accept", "application/json").map_err(transport)?;
    let init = web::RequestInit::new();
    init.set_method("GET");
    init.set_credentials(web::RequestCredentials::SameOrigin);
    init.set_headers(&headers);
    let request = web::Request::new_with_str_and_init(path, &init).map_err(transport)?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let resp: web::Response = resp_value.dyn_into().map_err(transport)?;
    if !resp.ok() {
        return Err(FetchError::Http {
            status: resp.status(),
            path: path.to_string(),
        });
    }
    let body = JsFuture::from(resp.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    body.as_string()
        .ok_or_else(|| FetchError::Transport(format!("non-text body from {}", path)))
}

pub async fn fetch_status(path: &str) -> Result<Status, FetchError> {
    let text = fetch_text(path).await?;
    Ok(Status::from_json(&text)?)
}

pub async fn fetch_history_page(path: &str) -> Result<HistoryPage, FetchError> {
    let text = fetch_text(path).await?;
    HistoryPage::from_json(&text)
}
