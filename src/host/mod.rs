/// Browser host abstraction: the handful of WebExtension calls the core needs
use std::rc::Rc;
use std::str::FromStr;

use async_trait::async_trait;
use js_sys::{Promise, Reflect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::badge::Badge;
use crate::error::HostError;
use crate::tab_data::TabInfo;

pub mod chrome;
pub mod firefox;
#[cfg(test)]
pub mod memory;

pub use chrome::ChromeHost;
pub use firefox::FirefoxHost;

/// Capabilities of the browser the core depends on
#[async_trait(?Send)]
pub trait Host {
    /// The active tab of the current window, if any
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;

    async fn tab_url(&self, tab_id: i32) -> Result<Option<String>, HostError>;

    async fn set_badge(&self, tab_id: i32, badge: &Badge) -> Result<(), HostError>;

    async fn store_put(&self, key: &str, value: Value) -> Result<(), HostError>;

    async fn store_get(&self, key: &str) -> Result<Option<Value>, HostError>;
}

/// Tab lifecycle events delivered by the browser
pub trait TabEvents {
    fn on_tab_updated(&self, handler: Box<dyn FnMut(i32, TabChange)>);

    fn on_tab_activated(&self, handler: Box<dyn FnMut(i32)>);
}

/// Relevant parts of a `tabs.onUpdated` notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabChange {
    pub status: Option<String>,
    pub url: Option<String>,
}

impl TabChange {
    /// The page finished loading and has a URL to check
    pub fn completed_url(&self) -> Option<&str> {
        match self.status.as_deref() {
            Some("complete") => self.url.as_deref(),
            _ => None,
        }
    }
}

/// Shared handle so components can hold a host as a prop
#[derive(Clone)]
pub struct HostHandle(pub Rc<dyn Host>);

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Chrome,
    Firefox,
}

impl FromStr for HostKind {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" | "edge" => Ok(HostKind::Chrome),
            "firefox" | "gecko" => Ok(HostKind::Firefox),
            other => Err(HostError::Api(format!("unknown browser host: {}", other))),
        }
    }
}

impl HostKind {
    pub fn connect(self) -> HostHandle {
        match self {
            HostKind::Chrome => HostHandle(Rc::new(ChromeHost::new())),
            HostKind::Firefox => HostHandle(Rc::new(FirefoxHost::new())),
        }
    }
}

// Helpers shared by the browser adapters

#[derive(Deserialize)]
struct ChangeInfo {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct ActiveInfo {
    #[serde(rename = "tabId")]
    tab_id: i32,
}

#[derive(Serialize)]
struct BadgeTextDetails<'a> {
    text: &'a str,
    #[serde(rename = "tabId")]
    tab_id: i32,
}

#[derive(Serialize)]
struct BadgeColorDetails<'a> {
    color: &'a str,
    #[serde(rename = "tabId")]
    tab_id: i32,
}

pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) async fn resolve(promise: Result<Promise, JsValue>) -> Result<JsValue, HostError> {
    let promise = promise.map_err(|e| HostError::Api(js_error_message(&e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| HostError::Api(js_error_message(&e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, HostError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

pub(crate) fn active_tab_query() -> Result<JsValue, HostError> {
    to_js(&serde_json::json!({ "active": true, "currentWindow": true }))
}

pub(crate) fn first_tab(tabs: JsValue) -> Result<Option<TabInfo>, HostError> {
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs)?;
    Ok(tabs.into_iter().next())
}

pub(crate) fn tab_url_of(tab: JsValue) -> Result<Option<String>, HostError> {
    let tab: TabInfo = serde_wasm_bindgen::from_value(tab)?;
    Ok(tab.url)
}

pub(crate) fn badge_text_details(tab_id: i32, badge: &Badge) -> Result<JsValue, HostError> {
    to_js(&BadgeTextDetails { text: &badge.text, tab_id })
}

pub(crate) fn badge_color_details(tab_id: i32, badge: &Badge) -> Result<JsValue, HostError> {
    to_js(&BadgeColorDetails { color: &badge.color, tab_id })
}

pub(crate) fn storage_items(key: &str, value: Value) -> Result<JsValue, HostError> {
    let mut items = Map::new();
    items.insert(key.to_string(), value);
    to_js(&Value::Object(items))
}

pub(crate) fn storage_entry(items: &JsValue, key: &str) -> Result<Option<Value>, HostError> {
    let entry = Reflect::get(items, &JsValue::from_str(key))
        .map_err(|e| HostError::Api(js_error_message(&e)))?;
    if entry.is_undefined() || entry.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_wasm_bindgen::from_value(entry)?))
}

pub(crate) fn tab_change(change: JsValue, tab: JsValue) -> TabChange {
    let status = serde_wasm_bindgen::from_value::<ChangeInfo>(change)
        .map(|info| info.status)
        .unwrap_or_default();
    let url = serde_wasm_bindgen::from_value::<TabInfo>(tab)
        .map(|tab| tab.url)
        .unwrap_or_default();
    TabChange { status, url }
}

pub(crate) fn activated_tab_id(info: JsValue) -> Option<i32> {
    serde_wasm_bindgen::from_value::<ActiveInfo>(info)
        .map(|info| info.tab_id)
        .ok()
}
