mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod tables;

use kitsusa::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
