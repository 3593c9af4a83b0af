use std::process;

use cerebro_config::ConfigError;
use cerebro_core::ExitCode;

fn main() {
    match cerebro_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("cerebro error: {err:#}");
            let code = if err.downcast_ref::<ConfigError>().is_some() {
                ExitCode::Config
            } else {
                ExitCode::Io
            };
            process::exit(code as i32);
        }
    }
}
