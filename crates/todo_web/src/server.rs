use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use todo_session::{FileSessionStorage, MemorySessionStorage, SessionManager, SessionStorage};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::controllers::{list_controller, todo_controller};
use crate::middleware::TracingMiddleware;

pub struct AppState {
    pub sessions: SessionManager,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let storage: Arc<dyn SessionStorage> = match &config.session_dir {
            Some(dir) => {
                info!("Storing sessions under {}", dir.display());
                Arc::new(FileSessionStorage::new(dir))
            }
            None => {
                info!(
                    capacity = config.session_capacity,
                    "Storing sessions in memory"
                );
                Arc::new(MemorySessionStorage::with_capacity(config.session_capacity))
            }
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: ServerConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            sessions: SessionManager::from_shared(storage),
            config,
        }
    }
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(list_controller::config)
        .configure(todo_controller::config);
}

pub async fn run(config: ServerConfig) -> Result<(), String> {
    let bind_address = config.bind_address();
    let workers = config.workers;
    let session_cookie = config.session_cookie.clone();
    let app_state = web::Data::new(AppState::new(config));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingMiddleware::new(&session_cookie))
            .configure(app_config)
    })
    .workers(workers)
    .bind(&bind_address)
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting todo service on http://{bind_address}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
