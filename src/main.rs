use bootcheck::utils::logger;
use bootcheck::{AppRegistry, Bootstrapper, CliArgs, EnvConfig};
use clap::Parser;

fn main() {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Starting bootstrap check");

    let source = EnvConfig::load_from(args.env_file.as_deref());
    let bootstrapper = Bootstrapper::new(source, AppRegistry::global());

    match bootstrapper.bootstrap() {
        Ok(handles) => {
            tracing::info!(project = %handles.db.project_id(), "Bootstrap succeeded");
            println!("✅ System secured and connected.");
        }
        Err(e) => {
            tracing::error!(
                "Bootstrap failed: {} (Category: {:?})",
                e.user_friendly_message(),
                e.category()
            );
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            println!("❌ Error starting the system: {}", e);
        }
    }
}
