//! AEM QuickLinks - Chrome Extension for AEM developers
//! Built with Rust + WASM + Yew

pub mod cloud;
pub mod content;
pub mod instance;
pub mod pattern;
pub mod project;
pub mod quicklinks;
pub mod settings;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core domain functions for JavaScript access
#[wasm_bindgen]
pub fn content_path(url: &str) -> Option<String> {
    content::content_path(url)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
