#![allow(non_snake_case)]

mod api;
mod config;
mod editor;
mod fixtures;
mod hooks;
mod models;
mod roster;
mod routes;
mod services;
mod session;
mod state;
mod ui;

use api::{ClientError, LegalFlowClient};
use config::AppConfig;
use dioxus::prelude::*;
use hooks::session::use_session_bootstrap;
use once_cell::sync::OnceCell;
use routes::Route;
use services::backend::StaffBackend;
use session::SessionContext;
use state::{AppActions, AppState};
use tracing::{error, info};
use ui::notifications::NotificationCenter;

pub(crate) static API_CLIENT: OnceCell<LegalFlowClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    bootstrap_infrastructure();
    LaunchBuilder::web()
        .with_cfg(dioxus_web::Config::new().rootname("main"))
        .launch(App);
}

fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(tracing::Level::INFO);
    });
}

fn bootstrap_infrastructure() {
    let config = AppConfig::from_env();
    info!(
        api = %config.api_base_url,
        profile = ?config.profile,
        firm = ?config.firm_id,
        "console configuration loaded"
    );

    match LegalFlowClient::new(config) {
        Ok(client) => {
            let _ = API_CLIENT.set(client);
            info!("LegalFlow API client initialized");
        }
        Err(err) => report_client_error("Failed to initialise the LegalFlow API client", &err),
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::default);
    let session = use_signal(SessionContext::default);

    use_context_provider(|| app_state);
    use_context_provider(|| session);
    use_context_provider(|| StaffBackend::for_platform(AppActions::new(app_state)));
    use_session_bootstrap(session);

    rsx! {
        div { class: "relative",
            Router::<Route> {}
            NotificationCenter {}
        }
    }
}
