//! Delays and frame scheduling for the browser build.

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

/// Runs `callback` on the next animation frame.
#[cfg(target_arch = "wasm32")]
pub fn next_frame(callback: impl FnOnce() + 'static) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    if window
        .request_animation_frame(closure.unchecked_ref())
        .is_err()
    {
        tracing::debug!("requestAnimationFrame unavailable");
    }
}
