use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use raytracing_cpu::{CpuBackend, render_single_pixel, utils::save_png};
use scenegraph::{
    SceneError,
    animation::simulate_all,
    geometry::Vec4,
    renderer::{ImageOrigin, RaytracerSettings, RenderingBackend},
    scene::{CameraLightVisitor, SceneDescription, test_scenes},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Parser)]
struct CommandLineArguments {
    #[command(flatten)]
    input: InputScene,

    #[arg(short, long, help = "Output filename; frames after the first get a numeric suffix")]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 512, help = "Image width in pixels")]
    width: u32,
    #[arg(long, default_value_t = 512, help = "Image height in pixels")]
    height: u32,
    #[arg(long, help = "Render at 1/n of the requested resolution")]
    resolution_divisor: Option<u32>,
    #[arg(long, value_delimiter = ',', num_args = 4, help = "Background colour as r,g,b,a in [0, 1]")]
    background: Option<Vec<f64>>,
    #[arg(long, action, help = "Write the bottom scanline first")]
    bottom_left_origin: bool,

    #[arg(long, default_value_t = 1, help = "Number of animation frames to render")]
    frames: u32,
    #[arg(long, default_value_t = 16.0, help = "Simulated milliseconds between frames")]
    frame_millis: f64,
    #[arg(long, value_delimiter = ',', help = "Toggle animations by index before rendering")]
    toggle: Vec<usize>,

    #[command(subcommand)]
    render_command: Option<RenderCommand>,
}

#[derive(Debug, clap::Args)]
#[group(multiple = false)]
struct InputScene {
    #[arg(long, help = "Load a scene description (JSON) from disk")]
    scene_path: Option<PathBuf>,
    #[arg(long, help = "Load a builtin test scene by name")]
    scene_name: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum RenderCommand {
    #[command(about = "Render every frame to PNG (default)")]
    Full,
    #[command(about = "Render a single pixel (in divided-resolution coordinates) and print diagnostics")]
    Pixel {
        #[arg(help = "Pixel x coordinate")]
        x: u32,
        #[arg(help = "Pixel y coordinate")]
        y: u32,
    },
    #[command(about = "List all builtin test scenes as JSON")]
    ListScenes,
    #[command(about = "Write the loaded scene description as JSON")]
    Export {
        #[arg(help = "Destination file")]
        path: PathBuf,
    },
}

fn frame_path(output: &Path, frame: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return output.to_path_buf();
    }
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = output.extension().and_then(|s| s.to_str()).unwrap_or("png");
    output.with_file_name(format!("{stem}_{frame:04}.{ext}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli_args = CommandLineArguments::parse();

    if let Some(RenderCommand::ListScenes) = cli_args.render_command {
        let scenes: Vec<&str> = test_scenes::all_test_scenes()
            .iter()
            .map(|s| s.name)
            .collect();
        println!("{}", serde_json::to_string(&scenes)?);
        return Ok(());
    }

    let (builtin_scene_settings, mut description) = if let Some(path) = &cli_args.input.scene_path {
        let description = SceneDescription::load(path)
            .with_context(|| format!("failed to load scene from {}", path.display()))?;
        (None, description)
    } else if let Some(name) = &cli_args.input.scene_name {
        let Some(scene_descriptor) = test_scenes::find_test_scene(name) else {
            bail!("no builtin scene named {name:?}, try list-scenes");
        };
        let description = (scene_descriptor.scene_func)()?;
        (Some((scene_descriptor.settings_func)()), description)
    } else {
        bail!("either --scene-path or --scene-name is required");
    };

    // override builtin / default settings
    let mut raytracer_settings = builtin_scene_settings.unwrap_or_default();
    raytracer_settings.resolution_divisor = cli_args
        .resolution_divisor
        .unwrap_or(raytracer_settings.resolution_divisor);
    if let Some(background) = &cli_args.background {
        raytracer_settings.background = Vec4(background[0], background[1], background[2], background[3]);
    }
    if cli_args.bottom_left_origin {
        raytracer_settings.image_origin = ImageOrigin::BottomLeft;
    }

    for &index in &cli_args.toggle {
        match description.animations.get_mut(index) {
            Some(animation) => {
                animation.toggle_active();
                info!("animation {index} active: {}", animation.active);
            }
            None => warn!("no animation with index {index}, ignoring"),
        }
    }

    match &cli_args.render_command {
        Some(RenderCommand::Export { path }) => {
            description
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote scene description to {}", path.display());
            Ok(())
        }
        &Some(RenderCommand::Pixel { x, y }) => {
            let (camera, lights) = CameraLightVisitor::new().run(&description.scene);
            let mut camera = camera.ok_or(SceneError::MissingCamera)?;
            camera.aspect *= cli_args.width as f64 / cli_args.height as f64;

            let pixel = render_single_pixel(
                &description.scene,
                &camera,
                &lights,
                cli_args.width,
                cli_args.height,
                x,
                y,
                &raytracer_settings,
            );
            let Some(pixel) = pixel else {
                let (width, height) = raytracer_settings.scaled_size(cli_args.width, cli_args.height);
                bail!("pixel ({x}, {y}) is outside the {width}x{height} image");
            };
            println!("hit: {}", pixel.hit);
            println!("t: {}", pixel.t);
            println!("point: {:?}", pixel.point);
            println!("normal: {:?}", pixel.normal);
            println!("color: {:?}", pixel.color);
            Ok(())
        }
        Some(RenderCommand::Full) | None => render_frames(&cli_args, &mut description, &raytracer_settings),
        Some(RenderCommand::ListScenes) => unreachable!("handled above"),
    }
}

// frame 0 shows the scene as loaded, every later frame advances the animations first
fn render_frames(
    cli_args: &CommandLineArguments,
    description: &mut SceneDescription,
    raytracer_settings: &RaytracerSettings,
) -> anyhow::Result<()> {
    let output = cli_args.output.clone().unwrap_or_else(|| PathBuf::from("output.png"));
    let mut backend = CpuBackend;

    for frame in 0..cli_args.frames {
        if frame > 0 {
            simulate_all(&mut description.animations, &mut description.scene, cli_args.frame_millis)?;
        }

        let (camera, lights) = CameraLightVisitor::new().run(&description.scene);
        let mut camera = camera.ok_or(SceneError::MissingCamera)?;
        camera.aspect *= cli_args.width as f64 / cli_args.height as f64;

        let render_output = backend.render(
            &description.scene,
            &camera,
            &lights,
            cli_args.width,
            cli_args.height,
            raytracer_settings,
        );

        let path = frame_path(&output, frame, cli_args.frames);
        save_png(&render_output, &path).with_context(|| format!("failed to write {}", path.display()))?;
        info!("frame {frame}: wrote {}", path.display());
    }

    Ok(())
}
