use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::info;
use warp::Filter;

use crate::error_handling::types::WebError;
use crate::session_management::session_manager::SessionManager;
use crate::web_interface::routes;

/// Web server for the HTTP API and dashboard
pub struct WebServer {
    manager: Arc<SessionManager>,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Start the web server on the given address and port; serves until the
    /// process is stopped.
    pub async fn start(&self, bind_address: &str, port: u16) -> Result<(), WebError> {
        let ip: IpAddr = bind_address
            .parse()
            .map_err(|_| WebError::BindFailed(format!("bad bind address: {}", bind_address)))?;

        // Compose routes
        let routes = routes::dashboard_route()
            .or(routes::login_route(self.manager.clone()))
            .or(routes::logout_route(self.manager.clone()))
            .or(routes::update_route(self.manager.clone()))
            .or(routes::status_route(self.manager.clone()))
            .or(routes::list_active_sessions_route(self.manager.clone()))
            .or(routes::list_sessions_route(self.manager.clone()))
            .or(routes::purge_sessions_route(self.manager.clone()));

        let addr: SocketAddr = (ip, port).into();
        info!("Web interface listening on {}", addr);
        warp::serve(routes).run(addr).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database_storage::DatabaseStorage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_start_rejects_unparseable_bind_address() {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("test.sqlite3");
        Box::leak(Box::new(dir));
        let storage = Arc::new(DatabaseStorage::new_file(path).await.unwrap());
        let manager = Arc::new(SessionManager::new(storage, None));

        let server = WebServer::new(manager);
        let result = server.start("not-an-address", 9090).await;
        assert!(matches!(result, Err(WebError::BindFailed(_))));
    }
}
