mod app;

use tessera_ui::Renderer;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[cfg(target_os = "android")]
use tessera_ui::winit::platform::android::activity::AndroidApp;

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(android_app: AndroidApp) {
    init_tracing();

    Renderer::run(
        app::app,
        |app| {
            tessera_components::pipelines::register_pipelines(app);
        },
        android_app.clone(),
    )
    .unwrap_or_else(|err| error!("App failed to run: {err}"));
}

#[allow(dead_code)]
#[cfg(target_os = "android")]
fn main() {}

#[cfg(not(target_os = "android"))]
pub fn desktop_main() -> anyhow::Result<()> {
    use tessera_ui::renderer::TesseraConfig;

    init_tracing();

    Renderer::run_with_config(
        app::app,
        |app| {
            tessera_components::pipelines::register_pipelines(app);
        },
        TesseraConfig {
            window_title: "Date & Time Picker".to_string(),
            sample_count: 1,
        },
    )
    .unwrap_or_else(|err| error!("App failed to run: {err}"));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("off,tessera_ui=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
