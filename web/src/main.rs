use dioxus::logger::tracing::Level;

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger unavailable: {err}");
    }

    #[cfg(target_arch = "wasm32")]
    ui::web::start();

    #[cfg(not(target_arch = "wasm32"))]
    dioxus::logger::tracing::warn!("forcegym-web only runs in the browser");
}
