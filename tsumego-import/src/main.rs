use std::process::ExitCode;

use tsumego_import::config::Config;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tsumego_import=info".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Converting problems from {} to {}",
        config.input_dir.display(),
        config.output.display()
    );

    match tsumego_import::run(&config) {
        Ok(summary) => {
            tracing::info!(
                "Successfully wrote {} problem(s) to {}",
                summary.converted,
                config.output.display()
            );
            if summary.failed > 0 {
                tracing::warn!("Failed to convert {} problem(s)", summary.failed);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Import failed: {e}");
            ExitCode::FAILURE
        }
    }
}
