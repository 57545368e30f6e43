/// Firefox adapter over the promise-based `browser.*` namespace
use async_trait::async_trait;
use js_sys::Promise;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::{Host, TabChange, TabEvents};
use crate::badge::Badge;
use crate::error::HostError;
use crate::tab_data::TabInfo;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["browser", "tabs"], js_name = query)]
    fn tabs_query(query_info: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "tabs"], js_name = get)]
    fn tabs_get(tab_id: i32) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "browserAction"], js_name = setBadgeText)]
    fn set_badge_text(details: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "browserAction"], js_name = setBadgeBackgroundColor)]
    fn set_badge_background_color(details: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "local"], js_name = get)]
    fn storage_get(key: &str) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["browser", "storage", "local"], js_name = set)]
    fn storage_set(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["browser", "tabs", "onUpdated"], js_name = addListener)]
    fn add_updated_listener(callback: &Closure<dyn FnMut(i32, JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = ["browser", "tabs", "onActivated"], js_name = addListener)]
    fn add_activated_listener(callback: &Closure<dyn FnMut(JsValue)>);
}

#[derive(Debug, Default)]
pub struct FirefoxHost;

impl FirefoxHost {
    pub fn new() -> Self {
        FirefoxHost
    }
}

#[async_trait(?Send)]
impl Host for FirefoxHost {
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let query = super::active_tab_query()?;
        let tabs = super::resolve(tabs_query(&query)).await?;
        super::first_tab(tabs)
    }

    async fn tab_url(&self, tab_id: i32) -> Result<Option<String>, HostError> {
        let tab = super::resolve(tabs_get(tab_id)).await?;
        super::tab_url_of(tab)
    }

    async fn set_badge(&self, tab_id: i32, badge: &Badge) -> Result<(), HostError> {
        let text = super::badge_text_details(tab_id, badge)?;
        let color = super::badge_color_details(tab_id, badge)?;
        super::resolve(set_badge_text(&text)).await?;
        super::resolve(set_badge_background_color(&color)).await?;
        Ok(())
    }

    async fn store_put(&self, key: &str, value: Value) -> Result<(), HostError> {
        let items = super::storage_items(key, value)?;
        super::resolve(storage_set(&items)).await?;
        Ok(())
    }

    async fn store_get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let items = super::resolve(storage_get(key)).await?;
        super::storage_entry(&items, key)
    }
}

impl TabEvents for FirefoxHost {
    fn on_tab_updated(&self, mut handler: Box<dyn FnMut(i32, TabChange)>) {
        let callback = Closure::wrap(Box::new(move |tab_id: i32, change: JsValue, tab: JsValue| {
            handler(tab_id, super::tab_change(change, tab));
        }) as Box<dyn FnMut(i32, JsValue, JsValue)>);

        add_updated_listener(&callback);
        callback.forget();
    }

    fn on_tab_activated(&self, mut handler: Box<dyn FnMut(i32)>) {
        let callback = Closure::wrap(Box::new(move |info: JsValue| {
            match super::activated_tab_id(info) {
                Some(tab_id) => handler(tab_id),
                None => log::warn!("Ignoring malformed tabs.onActivated payload"),
            }
        }) as Box<dyn FnMut(JsValue)>);

        add_activated_listener(&callback);
        callback.forget();
    }
}
