use std::process::ExitCode;

use clap::Parser;
use display_error_chain::DisplayErrorChain;
use gemini_pdf_cli::error::CliError;
use gemini_pdf_cli::{logging, Args, Driver, GeminiPdfService};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = logging::init(&args.log_config()) {
        eprintln!("{}", DisplayErrorChain::new(&err));
        return ExitCode::from(err.exit_code());
    }

    match run(&args).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Failed: {}", DisplayErrorChain::new(&err));
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: &Args) -> Result<String, CliError> {
    let prompt = args.prompt_source()?;
    let client = args.build_client()?;
    let driver = Driver::new(GeminiPdfService::new(client));
    driver.run(&args.run_request(prompt)).await
}
