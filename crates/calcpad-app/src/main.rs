//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting CalcPad");

    let config = calcpad_app::AppConfig::from_args(std::env::args().skip(1));
    pollster::block_on(calcpad_app::App::run(config));
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
