use std::sync::Arc;

use log::info;

use crate::configuration::config::Config;
use crate::error_handling::types::ControllerError;
use crate::session_management::session_manager::SessionManager;
use crate::storage::database_storage::DatabaseStorage;
use crate::web_interface::web_server::WebServer;

/// Owns the startup sequence: configuration in, running web server out.
///
/// The controller holds no session state of its own; once `run` has wired
/// the directory, the manager and the server together, all lifecycle state
/// lives in the directory.
pub struct Controller {
    pub config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Opens the session directory, builds the lifecycle manager on top of
    /// it and serves the web interface until the process is stopped.
    pub async fn run(&mut self) -> Result<(), ControllerError> {
        info!(
            "Opening session directory at {}",
            self.config.database_path.display()
        );
        let storage = Arc::new(
            DatabaseStorage::new_file(&self.config.database_path)
                .await
                .map_err(ControllerError::StorageError)?,
        );

        let manager = Arc::new(SessionManager::new(
            storage,
            self.config.host_interface.clone(),
        ));

        let server = WebServer::new(manager);
        server
            .start(&self.config.bind_address, self.config.port)
            .await
            .map_err(ControllerError::WebError)
    }
}
