use std::time::Duration;

use blockgen::{Coordinator, EngineConfig, MapEvent, PanelStatus};
use clap::{Parser, Subcommand};
use foundation::GeoExtent;
use foundation::math::{LonLat, lonlat_to_mercator};
use scene::World;
use share::{
    ShareConfig, SharePayload, build_share_url, decode, encode, share_config_from_url,
    strip_share_param,
};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod headless;
mod report;
mod terrain;

use headless::HeadlessMap;
use report::{BlockReport, CameraReport, ExtentReport, SessionReport};
use terrain::{CliTerrain, TerrainKind};

type CliCoordinator = Coordinator<HeadlessMap, World, CliTerrain>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Relief blocks from map squares, headless")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct TerrainArgs {
    /// Terrain provider
    #[arg(long, value_enum, default_value_t = TerrainKind::Synthetic)]
    terrain: TerrainKind,

    /// Height used by the flat provider (meters)
    #[arg(long, default_value_t = 0.0)]
    flat_height: f64,

    /// Simulated latency per sampling request (milliseconds)
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Samples per wall edge minus one (overrides BLOCKBILD_FIDELITY)
    #[arg(long)]
    fidelity: Option<u32>,

    /// Page URL used to print a share link for the result
    #[arg(long)]
    base_url: Option<String>,

    /// Make the printed share link open in challenge mode
    #[arg(long)]
    hide_map: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a block for a bounding box or a share link
    Generate {
        /// Bounding box: west,south,east,north
        #[arg(long, value_parser = parse_bbox, conflicts_with = "share", required_unless_present = "share")]
        bbox: Option<GeoExtent>,

        /// Share token, or a full URL carrying one
        #[arg(long)]
        share: Option<String>,

        #[command(flatten)]
        terrain: TerrainArgs,
    },

    /// Simulate a drag on the map from one corner to another
    Drag {
        /// Drag start: lon,lat
        #[arg(long, value_parser = parse_lonlat)]
        from: LonLat,

        /// Drag end: lon,lat
        #[arg(long, value_parser = parse_lonlat)]
        to: LonLat,

        #[command(flatten)]
        terrain: TerrainArgs,
    },

    /// Encode or decode share tokens
    Share {
        #[command(subcommand)]
        command: ShareCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ShareCommand {
    /// Print the token (or link) for a bounding box
    Encode {
        /// Bounding box: west,south,east,north
        #[arg(long, value_parser = parse_bbox)]
        bbox: GeoExtent,

        /// Open the link in challenge mode
        #[arg(long)]
        hide_map: bool,

        /// Print a full link on this page URL instead of the bare token
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Print the payload carried by a token
    Decode { token: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Generate {
            bbox,
            share,
            terrain,
        } => generate(bbox, share, terrain).await,
        Command::Drag { from, to, terrain } => drag(from, to, terrain).await,
        Command::Share { command } => run_share(command),
    }
}

fn coordinator(args: &TerrainArgs) -> CliCoordinator {
    let mut config = EngineConfig::from_env();
    if let Some(fidelity) = args.fidelity {
        config.fidelity = fidelity.max(1);
    }
    let terrain = CliTerrain::new(
        args.terrain,
        args.flat_height,
        Duration::from_millis(args.latency_ms),
    );
    info!(fidelity = config.fidelity, terrain = ?args.terrain, "engine configured");
    Coordinator::new(&config, HeadlessMap::default(), World::new(), terrain)
}

async fn generate(
    bbox: Option<GeoExtent>,
    share: Option<String>,
    args: TerrainArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut c = coordinator(&args);
    let mut base_url = args.base_url.clone();

    match (bbox, share) {
        (_, Some(share)) => {
            let config = share_config(&share)?;
            base_url = reshare_base(&share, base_url);
            c.initialize(Some(config)).await?;
        }
        (Some(extent), None) => {
            c.initialize(None).await?;
            if let Err(err) = c.bootstrap_extent(extent).await {
                error!("block not generated: {err}");
            }
        }
        (None, None) => return Err("either --bbox or --share is required".into()),
    }

    finish(&mut c, base_url.as_deref(), args.hide_map)
}

async fn drag(from: LonLat, to: LonLat, args: TerrainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut c = coordinator(&args);
    c.initialize(None).await?;

    let anchor = lonlat_to_mercator(from);
    let cursor = lonlat_to_mercator(to);
    let (tx, mut rx) = mpsc::channel(4);
    tx.send(MapEvent::DrawStart).await?;
    tx.send(MapEvent::DrawMove { anchor, cursor }).await?;
    tx.send(MapEvent::DrawEnd { anchor, cursor }).await?;
    drop(tx);
    c.run(&mut rx).await;

    finish(&mut c, args.base_url.as_deref(), args.hide_map)
}

fn share_config(value: &str) -> Result<ShareConfig, Box<dyn std::error::Error>> {
    if value.contains("://") {
        return share_config_from_url(value).ok_or_else(|| "no usable share parameter in URL".into());
    }
    let payload = decode(value)?;
    let extent = payload.extent.normalize().ok_or("share token carries an invalid extent")?;
    Ok(ShareConfig {
        extent,
        hide_map: payload.hide_map,
    })
}

/// Page to print a new share link on: the explicit one, or the page a link
/// was opened from with its old token removed.
fn reshare_base(share: &str, base_url: Option<String>) -> Option<String> {
    base_url.or_else(|| share.contains("://").then(|| strip_share_param(share)))
}

fn finish(
    c: &mut CliCoordinator,
    base_url: Option<&str>,
    hide_map: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if hide_map {
        c.session_mut().set_hide_map(true);
    }
    let session = c.session();
    let report = SessionReport {
        status: session.status().label(),
        message: session.status().message(),
        phases: session
            .journal()
            .messages("phase")
            .into_iter()
            .map(str::to_string)
            .collect(),
        block: c.block().map(BlockReport::from),
        camera: c.scene().camera().map(CameraReport::from),
        share_url: base_url.and_then(|url| c.share_url(url)),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if session.status() == PanelStatus::Error {
        return Err("block generation failed".into());
    }
    Ok(())
}

fn run_share(command: ShareCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ShareCommand::Encode {
            bbox,
            hide_map,
            base_url,
        } => {
            let extent = bbox.normalize().ok_or("invalid bounding box")?;
            let payload = SharePayload { extent, hide_map };
            let out = match base_url {
                Some(url) => build_share_url(&url, &payload)?,
                None => encode(&payload)?,
            };
            println!("{out}");
        }
        ShareCommand::Decode { token } => {
            let payload = decode(&token)?;
            let value = serde_json::json!({
                "extent": ExtentReport::from(payload.extent),
                "hideMap": payload.hide_map,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    parts
        .try_into()
        .map_err(|parts: Vec<f64>| format!("expected {N} comma-separated numbers, got {}", parts.len()))
}

fn parse_bbox(value: &str) -> Result<GeoExtent, String> {
    let [west, south, east, north] = parse_numbers::<4>(value)?;
    let extent = GeoExtent::new(west, south, east, north);
    if !extent.is_valid() {
        return Err(format!("{value} is not a valid west,south,east,north box"));
    }
    Ok(extent)
}

fn parse_lonlat(value: &str) -> Result<LonLat, String> {
    let [lon, lat] = parse_numbers::<2>(value)?;
    Ok(LonLat::new(lon, lat))
}
