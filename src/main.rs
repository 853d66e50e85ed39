use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match leasedesk::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("leasedesk: {e}");
            ExitCode::FAILURE
        }
    }
}
