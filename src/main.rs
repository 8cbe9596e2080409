mod scene;
#[cfg(feature = "viewer")]
mod viewer;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use dualgrid_compose::{SoftwareRenderer, Viewport, submit, upload_all};

#[derive(Parser, Debug)]
#[command(name = "dualgrid", version, about = "Dual-grid tile renderer")]
struct Cli {
    /// Log at debug level instead of info
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a scene and write it as a PNG
    Render(RenderArgs),
    /// Write each material's remapped atlas as NN_<name>.png
    Atlas {
        /// Scene TOML file
        #[arg(long)]
        scene: PathBuf,
        /// Directory to write the atlases into
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Open an interactive window on a scene
    #[cfg(feature = "viewer")]
    View {
        /// Scene TOML file
        #[arg(long)]
        scene: PathBuf,
        #[arg(long, default_value_t = 1280)]
        width: i32,
        #[arg(long, default_value_t = 720)]
        height: i32,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Scene TOML file
    #[arg(long)]
    scene: PathBuf,
    /// Output PNG path
    #[arg(long, short)]
    out: PathBuf,
    /// Viewport left edge in world pixels
    #[arg(long, allow_hyphen_values = true)]
    left: Option<i32>,
    /// Viewport top edge in world pixels
    #[arg(long, allow_hyphen_values = true)]
    top: Option<i32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Command::Render(args) => render(&args),
        Command::Atlas { scene, out_dir } => write_atlases(&scene, &out_dir),
        #[cfg(feature = "viewer")]
        Command::View {
            scene,
            width,
            height,
        } => scene::load_scene(&scene).and_then(|s| viewer::run(s, width, height)),
    };
    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn render(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let mut scene = scene::load_scene(&args.scene)?;
    let base = scene.viewport;
    let vp = Viewport::new(
        args.left.unwrap_or(base.left),
        args.top.unwrap_or(base.top),
        args.width.unwrap_or(base.width),
        args.height.unwrap_or(base.height),
    );
    let t0 = Instant::now();
    scene.dual.composite_if_dirty(vp);
    let mut renderer = SoftwareRenderer::new(vp.width, vp.height);
    let textures = upload_all(&mut renderer, scene.dual.registry())?;
    let draws = submit(&mut renderer, &textures, scene.dual.batches());
    ensure_parent(&args.out)?;
    renderer.into_canvas().save(&args.out)?;
    log::info!(
        "wrote {} ({}x{}, {} draws) in {:.2} ms",
        args.out.display(),
        vp.width,
        vp.height,
        draws,
        t0.elapsed().as_secs_f32() * 1000.0
    );
    Ok(())
}

fn write_atlases(scene_path: &Path, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let scene = scene::load_scene(scene_path)?;
    fs::create_dir_all(out_dir)?;
    for (material, name) in scene.dual.registry().iter().zip(&scene.names) {
        let path = out_dir.join(format!("{:02}_{}.png", material.id, name));
        material.atlas.image().save(&path)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
