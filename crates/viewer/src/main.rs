use std::env;
use std::process::ExitCode;

use tracing::error;

mod app;

fn main() -> ExitCode {
    app::init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let result = app::parse_args(&args)
        .and_then(|options| app::apply_env_overrides(options, |key| env::var(key).ok()))
        .and_then(app::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(error = %message, "viewer_failed");
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}
