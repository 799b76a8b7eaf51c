use bootcheck::utils::logger;
use bootcheck::{run_health_checks, AppRegistry, Bootstrapper, CliArgs, ConsoleReporter, EnvConfig};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("Starting integration checks");

    let source = EnvConfig::load_from(args.env_file.as_deref());
    let bootstrapper = Bootstrapper::new(source, AppRegistry::global());

    let mut reporter = ConsoleReporter;
    let report = run_health_checks(&bootstrapper, &mut reporter).await;

    tracing::debug!(?report, "Integration checks finished");
}
