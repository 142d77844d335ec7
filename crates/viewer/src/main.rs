use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use agol_webmap_core::portal::DEFAULT_PORTAL_URL;
use agol_webmap_core::prelude::*;
use clap::Parser;
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod client;
mod page;
mod server;

use server::{ViewerServer, ViewerState};

#[derive(Parser, Debug)]
#[command(
    name = "agol-webmap-viewer",
    version,
    about = "Serve an ArcGIS Online web map as an interactive browser map",
    long_about = "Fetches a web map item from an ArcGIS portal, converts its basemaps, \
                  feature collections and ESRI symbology into a browser map, and serves \
                  it with a click-to-query attribute popup."
)]
struct Args {
    /// Portal item id of the web map
    #[arg(long, default_value = "b528fdc8b48e40ad925225387966f523")]
    item_id: String,

    /// Portal base URL
    #[arg(long, default_value = DEFAULT_PORTAL_URL)]
    portal: String,

    /// Load a saved item data JSON file instead of fetching from the portal
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Name of the layer whose extent frames the initial view.
    /// Without it (or when no layer matches) the view frames all features.
    #[arg(short, long)]
    extent_layer: Option<String>,

    /// Initial zoom level
    #[arg(long, default_value_t = 10.0)]
    zoom: f64,

    /// Address to serve the map on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Click tolerance for feature queries, in pixels
    #[arg(long, default_value_t = 3.0)]
    hit_tolerance: f64,

    /// Hover highlight colour
    #[arg(long, default_value = "#ff0000")]
    highlight_color: String,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let highlight_color =
        Color::from_hex(&args.highlight_color).wrap_err("Invalid --highlight-color")?;

    let source: Box<dyn WebMapSource> = match &args.file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(PortalClient::new(&args.portal, &args.item_id)),
    };
    let document = source
        .fetch_web_map()
        .await
        .wrap_err("Failed to load web map")?;

    let options = MapOptions {
        extent_layer_name: args.extent_layer.clone(),
        zoom: args.zoom,
        highlight_color,
    };
    let map = build_map(&document, &options).wrap_err("Failed to convert web map")?;

    let state = ViewerState::new(map, args.hit_tolerance).wrap_err("Failed to encode map")?;
    let server = ViewerServer::start(args.listen, Arc::new(state))
        .await
        .wrap_err_with(|| format!("Failed to listen on {}", args.listen))?;
    info!("Serving map at http://{}/", server.local_addr());

    tokio::signal::ctrl_c()
        .await
        .wrap_err("Failed to wait for Ctrl-C")?;
    info!("Shutting down");
    server.shutdown().await?;

    Ok(())
}
