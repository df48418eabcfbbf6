#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod boot;
mod config_runtime;
mod dom;
mod image_view;
mod input;
mod page_guard;
mod panel_view;
mod viewer_app;

fn main() {
    boot::run();
}
