/// Site Scratchpad - Chrome Extension for per-site tasks, notes and files
/// Built with Rust + WASM + Yew

pub mod config;
pub mod host;
pub mod records;
pub mod site_data;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Hostname used as the record key for a URL, or "" when the page has none
#[wasm_bindgen]
pub fn extract_host(url: &str) -> String {
    host::extract_host(url).unwrap_or_default()
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
