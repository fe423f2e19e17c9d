#![cfg(target_arch = "wasm32")]
mod controls;
mod dom;
mod simulator;

pub use simulator::FaceSimulator;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("facesim-web starting");
    Ok(())
}
