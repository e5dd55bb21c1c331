use log::{error, info};
use ruche::configuration::config::Config;
use ruche::controller::controller_handler::Controller;

#[tokio::main]
async fn main() {
    // Example how to log
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
██████╗ ██╗   ██╗ ██████╗██╗  ██╗███████╗
██╔══██╗██║   ██║██╔════╝██║  ██║██╔════╝
██████╔╝██║   ██║██║     ███████║█████╗
██╔══██╗██║   ██║██║     ██╔══██║██╔══╝
██║  ██║╚██████╔╝╚██████╗██║  ██║███████╗
╚═╝  ╚═╝ ╚═════╝  ╚═════╝╚═╝  ╚═╝╚══════╝
==========================================
   A login session directory     v0.1.0
==========================================
"
    );

    info!("Importing configuration");

    let cli = match Config::from_args() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid command-line configuration: {}", e);
            std::process::exit(1);
        }
    };

    let config = match &cli.config_file {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to import configuration from file: {}", e);
                std::process::exit(1);
            }
        },
        None => cli,
    };

    info!("Configuration imported successfully");

    let mut controller = Controller::new(config);

    let result = tokio::spawn(async move {
        info!("Spawning the controller");
        if let Err(e) = controller.run().await {
            error!("Error occured in the controller process: {}, exiting...", e);
            std::process::exit(1);
        }
    });

    let _ = result.await.map_err(|e| {
        error!("Error joining at the end of execution: {:?}", e);
        std::process::exit(1);
    });
}
