use crate::error::LoadError;
use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::renderer::{FrameStats, Renderer};
use crate::scene::loader::init_scene_resources;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where frame `frame` of `frames` is written. A single frame goes to
/// `output` itself; sequences get a zero-padded index before the extension.
pub fn frame_output_path(output: &str, frame: usize, frames: usize) -> PathBuf {
    let path = Path::new(output);
    if frames <= 1 {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{:04}.{}", stem, frame, ext.to_string_lossy()),
        None => format!("{}_{:04}", stem, frame),
    };
    path.with_file_name(file_name)
}

/// Runs the renderer headless: renders `frames` frames, advancing the mesh
/// rotation by one frame time between them, and saves every frame.
pub fn run_cli(config: &Config) -> Result<FrameStats, LoadError> {
    info!("Starting CLI mode...");
    let width = config.render.width;
    let height = config.render.height;

    let mut context = init_scene_resources(config)?;
    let mut renderer = Renderer::from_config(&config.render);
    let mut buffer = vec![0u32; width * height];
    let frames = config.render.frames.max(1);
    let rotation_step = config.render.rotation_speed * config.render.frame_time;

    info!(
        "Rendering {} frame(s) at {}x{} in {} mode ({} shading, normal map {})",
        frames,
        width,
        height,
        renderer.settings.mode,
        renderer.settings.shading,
        if renderer.settings.use_normal_map { "on" } else { "off" }
    );

    let mut totals = FrameStats::default();
    let start_time = Instant::now();

    for frame in 0..frames {
        if config.render.rotate && frame > 0 {
            context.rotate_meshes(rotation_step);
        }

        let frame_start = Instant::now();
        let stats = renderer.render(&mut context, &mut buffer)?;
        info!("Frame {} rendered in {:.2?}", frame, frame_start.elapsed());
        debug!("Frame {}: {}", frame, stats);
        totals += stats;

        let path = frame_output_path(&config.render.output, frame, frames);
        save_buffer_to_image(&buffer, width, height, &path)?;
    }

    info!(
        "Render completed in {:.2?} ({})",
        start_time.elapsed(),
        totals
    );
    Ok(totals)
}
