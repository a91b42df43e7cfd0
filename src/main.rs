#[tokio::main]
async fn main() {
    let env_file = twads::config::load_env_file();
    twads::logging::init_logging();
    match env_file {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => tracing::debug!("no environment file found"),
        Err(err) => tracing::warn!(error = %err, "failed to read environment file"),
    }
    std::process::exit(twads::run().await);
}
