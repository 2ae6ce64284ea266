#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    earthview_app_lib::run()
}
