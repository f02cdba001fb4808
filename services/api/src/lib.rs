mod cli;
mod infra;
mod report;
mod routes;
mod server;

use load_index::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
