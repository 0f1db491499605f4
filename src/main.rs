//! Headless driver: streams and simulates a world for a fixed number of frames.
#![forbid(unsafe_code)]

mod app;
mod event;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use blockworld_blocks::BlockType;
use blockworld_io::load_world;
use blockworld_physics::BodyInput;
use blockworld_world::{WorldParams, load_params_from_path};

use crate::app::App;
use crate::event::Event;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World parameters (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u32>,

    /// Override the streaming radius in chunks
    #[arg(long)]
    draw_distance: Option<i32>,

    /// Frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Directory holding params.toml and changes.toml
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Start from the save in --save-dir
    #[arg(long)]
    load: bool,

    /// Forward input in [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    walk_forward: f32,

    /// Strafe input in [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    walk_right: f32,

    /// Body yaw in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    yaw: f32,

    /// Keep jumping whenever grounded
    #[arg(long)]
    jump: bool,

    /// Dig out the block under the body at this frame
    #[arg(long)]
    dig_at: Option<u64>,

    /// Place a block at X Y Z on the first frame
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    place: Option<Vec<i32>>,

    /// Block kind used by --place
    #[arg(long, default_value = "stone")]
    place_kind: String,

    /// Remove the block at X Y Z on the first frame
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    remove: Option<Vec<i32>>,

    /// Respawn the body at this frame
    #[arg(long)]
    reset_at: Option<u64>,

    /// Generate chunks immediately instead of in idle slots
    #[arg(long)]
    sync: bool,

    /// Log filter, e.g. "info" or "stream=debug,gen=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .parse_env("RUST_LOG")
        .init();

    let mut params = match &args.config {
        Some(path) => load_params_from_path(path)?,
        None => WorldParams::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(d) = args.draw_distance {
        params.streaming.draw_distance = d;
    }
    if args.sync {
        params.streaming.async_loading = false;
    }

    let mut app = App::new(params, args.save_dir.clone());
    if args.load {
        let dir = args.save_dir.as_deref().ok_or("--load requires --save-dir")?;
        app.world.load(load_world(dir)?);
        app.respawn();
    }

    app.events.emit_now(Event::MovementRequested {
        input: BodyInput {
            forward: args.walk_forward,
            right: args.walk_right,
            jump: args.jump,
        },
        yaw: args.yaw.to_radians(),
    });
    if let Some(pos) = &args.place {
        let kind = BlockType::by_name(&args.place_kind)
            .ok_or_else(|| format!("unknown block kind {:?}", args.place_kind))?;
        app.events.emit_now(Event::PlaceBlockRequested {
            x: pos[0],
            y: pos[1],
            z: pos[2],
            kind,
        });
    }
    if let Some(pos) = &args.remove {
        app.events.emit_now(Event::RemoveBlockRequested {
            x: pos[0],
            y: pos[1],
            z: pos[2],
        });
    }
    if let Some(frame) = args.reset_at {
        app.events.emit_at(frame, Event::ResetRequested);
    }
    if let Some(frame) = args.dig_at {
        app.events.emit_at(frame, Event::DigRequested);
    }
    if args.save_dir.is_some() {
        app.events.emit_at(args.frames.saturating_sub(1), Event::SaveRequested);
    }

    for _ in 0..args.frames {
        app.step(args.dt);
    }

    let p = app.body.position;
    let s = &app.stats;
    log::info!(
        "{} frames, {} physics steps; body at ({:.2}, {:.2}, {:.2}) on_ground={}",
        s.frames,
        s.physics_steps,
        p.x,
        p.y,
        p.z,
        app.body.on_ground
    );
    log::info!(
        "chunks: {} loaded, {} unloaded, {} streamed now, {} queued; edits: +{} -{}, {} stored",
        s.chunks_loaded,
        s.chunks_unloaded,
        app.world.chunk_coords().len(),
        app.world.pending(),
        s.blocks_added,
        s.blocks_removed,
        app.world.change_store().stats().block_edits
    );
    log::info!("water plane at y = {:.1}", app.world.params().water_level());
    Ok(())
}
