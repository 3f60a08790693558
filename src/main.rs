use clap::Parser;
use registry_browser::cli::{Args, Runner};
use registry_browser::logging::init_tracing;
use std::io::Write;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let runner = Runner::new(args);
    match runner.run().await {
        Ok(rendered) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(rendered.as_bytes()) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
