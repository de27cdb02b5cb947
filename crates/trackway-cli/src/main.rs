//! The `trackway` binary.

use std::process::ExitCode;

use trackway_cli::CommandRegistry;

#[tokio::main]
async fn main() -> ExitCode {
    let registry = CommandRegistry::with_builtin_commands();
    let matches = registry.build_cli().get_matches();

    match registry.run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(status = e.status_code(), "Command failed");
            eprintln!("trackway: {e}");
            ExitCode::FAILURE
        }
    }
}
