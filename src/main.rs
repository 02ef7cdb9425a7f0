use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    clinic_lib::init_tracing();

    match clinic_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
