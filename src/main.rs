use clap::Parser;
use mdpad::core::config;
use mdpad::store::{StoreState, serve};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdpad", about = "Markdown note editor cloud-files store")]
struct Args {
    /// Address to bind (host:port)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory where stored blobs live
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to mdpad.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("mdpad.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config error ({}), continuing with defaults", e);
        config::MdpadConfig::default()
    });
    let resolved = config::resolve(&config, args.listen.as_deref(), args.root.as_ref());

    log::info!("mdpad store starting up on {}", resolved.listen);

    let listener = tokio::net::TcpListener::bind(&resolved.listen).await?;
    println!("Cloud files store running at http://{}", resolved.listen);
    println!("Store root: {}", resolved.store_root.display());

    serve(listener, StoreState::new(resolved.store_root)).await
}
