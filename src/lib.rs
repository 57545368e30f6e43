/// Consumer Rights Check - Browser extension that flags companies with Consumer Rights Wiki articles
/// Built with Rust + WASM + Yew

pub mod background;
pub mod badge;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod lookup;
pub mod popup;
pub mod storage;
pub mod tab_data;
pub mod ui;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::host::{ChromeHost, FirefoxHost, HostKind};

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export company name extraction for JavaScript access
#[wasm_bindgen]
pub fn extract_company_name(url: &str) -> Option<String> {
    domain::extract_company_name(url)
}

fn host_kind(host: &str) -> Result<HostKind, JsValue> {
    host.parse::<HostKind>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Register tab listeners in the background context ("chrome" or "firefox")
#[wasm_bindgen]
pub fn start_background(host: &str) -> Result<(), JsValue> {
    match host_kind(host)? {
        HostKind::Chrome => background::install(Rc::new(ChromeHost::new())),
        HostKind::Firefox => background::install(Rc::new(FirefoxHost::new())),
    }
    Ok(())
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup(host: &str) -> Result<(), JsValue> {
    let props = ui::popup::AppProps {
        host: host_kind(host)?.connect(),
    };
    yew::Renderer::<ui::popup::App>::with_props(props).render();
    Ok(())
}
