/// JS bridge to chrome.tabs, chrome.storage.local and the clipboard

use crate::host::extract_host;
use crate::storage::{KeyValueStore, StoreError};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyText(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageGet(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageRemove(key: &str) -> Result<(), JsValue>;
}

/// Hostname of the focused tab in the current window, if it has one
pub async fn resolve_active_host() -> Option<String> {
    match getActiveTabUrl().await {
        Ok(url) => url.as_string().and_then(|url| extract_host(&url)),
        Err(e) => {
            log::warn!("Active tab query failed: {:?}", e);
            None
        }
    }
}

pub async fn open_in_new_tab(url: &str) -> Result<(), String> {
    openTab(url)
        .await
        .map_err(|e| format!("Failed to open {}: {:?}", url, e))
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    copyText(text)
        .await
        .map_err(|e| format!("Failed to copy: {:?}", e))
}

/// `chrome.storage.local` as a [`KeyValueStore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStore;

fn backend_error(action: &str, e: impl std::fmt::Debug) -> StoreError {
    StoreError::Backend(format!("{}: {:?}", action, e))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, StoreError> {
    // Plain objects, not JS Maps, so chrome.storage accepts them
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| backend_error("serialize", e))
}

fn from_js(value: JsValue) -> Result<Map<String, Value>, StoreError> {
    if value.is_null() || value.is_undefined() {
        return Ok(Map::new());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| backend_error("parse storage", e))
}

impl KeyValueStore for ChromeStore {
    async fn get_all(&self) -> Result<Map<String, Value>, StoreError> {
        let items = storageGet(JsValue::NULL)
            .await
            .map_err(|e| backend_error("get all", e))?;
        from_js(items)
    }

    async fn get(&self, keys: &[String]) -> Result<Map<String, Value>, StoreError> {
        let items = storageGet(to_js(keys)?)
            .await
            .map_err(|e| backend_error("get", e))?;
        from_js(items)
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        storageSet(to_js(&items)?)
            .await
            .map_err(|e| backend_error("set", e))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        storageRemove(key)
            .await
            .map_err(|e| backend_error("remove", e))
    }
}
