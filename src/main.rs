use std::{fs::File, path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use whitted::{
    error::Result,
    math::noise::PerlinNoise,
    render::canvas::ImageFormat,
    scene::{World, io::yaml},
};

/// Whitted style ray tracer.
/// Renders scenes described in yaml files, with basic shapes, groups, csg and .obj models.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// The scene file to render
    scene_file: PathBuf,

    /// The output path of the rendered image.
    /// By default it's `./<scene_filename>.<format>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the output image. Guessed from the output extension when omitted, png otherwise
    #[arg(short, long)]
    format: Option<ImageFormat>,

    /// Width (in pixels) of the output image. Overrides the one in the scene file
    #[arg(long)]
    width: Option<usize>,

    /// Height (in pixels) of the output image. Overrides the one in the scene file
    #[arg(long)]
    height: Option<usize>,

    /// Field of view of the camera in radians. Overrides the one in the scene file
    #[arg(long)]
    fov: Option<f64>,

    /// How many times a ray can bounce off reflective or transparent surfaces.
    /// Overrides the one in the scene file
    #[arg(short, long)]
    depth: Option<usize>,

    /// Seed of the noise used by perturbed patterns
    #[arg(long, default_value_t = PerlinNoise::DEFAULT_SEED)]
    seed: u64,

    /// Test rays against group bounding boxes before their children
    #[arg(long)]
    bbox: bool,

    /// Don't show the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn output_format(&self) -> ImageFormat {
        self.format
            .or_else(|| {
                self.output
                    .as_ref()
                    .and_then(|path| path.extension())
                    .and_then(|extension| ImageFormat::from_extension(&extension.to_string_lossy()))
            })
            .unwrap_or(ImageFormat::Png)
    }

    fn output_path(&self, format: ImageFormat) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self.scene_file.file_stem().unwrap_or_default();
            PathBuf::from(stem).with_extension(format.to_string())
        })
    }
}

fn progress_bar(rows: usize) -> ProgressBar {
    let bar = ProgressBar::new(rows as u64);
    match ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} rows shaded: {human_pos}/{human_len} {percent}% ({eta})",
    ) {
        Ok(style) => bar.with_style(style),
        Err(_) => bar,
    }
}

fn run(args: Args) -> Result<()> {
    let noise = Arc::new(PerlinNoise::with_seed(args.seed));
    let mut config = yaml::parse_file(&args.scene_file, noise)?;

    config.camera.width = args.width.or(config.camera.width);
    config.camera.height = args.height.or(config.camera.height);
    config.camera.field_of_view = args.fov.or(config.camera.field_of_view);
    let camera = config.camera.build()?;

    let mut world = config.world;
    world.set_max_recursive_depth(
        args.depth
            .or(config.max_reflective_depth)
            .unwrap_or(World::MAX_RECURSIVE_DEPTH),
    );
    world.set_use_bounding_boxes(args.bbox);

    let canvas = if args.no_progress {
        world.render(&camera)?
    } else {
        let bar = progress_bar(camera.vsize());
        let canvas = world.render_with_progress(&camera, |_| bar.inc(1))?;
        bar.finish();
        canvas
    };

    let format = args.output_format();
    let output_path = args.output_path(format);
    canvas.save(File::create(&output_path)?, format)?;
    info!("image saved to {}", output_path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
