use clap::Parser;
use log::{error, info};
use softraster::app::run_cli;
use softraster::io::config::Config;
use softraster::pipeline::mode::{RenderMode, ShadingMode};
use std::process::ExitCode;

/// Software triangle rasterizer driven by a TOML scene file.
#[derive(Parser, Debug)]
#[command(name = "softraster")]
#[command(about = "CPU triangle rasterizer with depth, vertex color and textured/lit views")]
struct Args {
    /// Scene configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path, format chosen by extension
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Shader used for every mesh
    #[arg(short, long, value_enum)]
    mode: Option<RenderMode>,

    /// Terms of the lit model to output
    #[arg(short, long, value_enum)]
    shading: Option<ShadingMode>,

    /// Number of frames to render
    #[arg(short, long)]
    frames: Option<usize>,

    /// Shade with interpolated normals instead of the normal map
    #[arg(long)]
    no_normal_map: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.render.output = output.clone();
        }
        if let Some(mode) = self.mode {
            config.render.mode = mode;
        }
        if let Some(shading) = self.shading {
            config.render.shading = shading;
        }
        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if self.no_normal_map {
            config.render.use_normal_map = false;
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config file: {}", path);
            match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            info!("No config file given, using the built-in scene");
            Config::default()
        }
    };
    args.apply(&mut config);

    match run_cli(&config) {
        Ok(_) => {
            info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
