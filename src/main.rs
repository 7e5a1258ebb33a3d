use clap::Parser;
use image::ImageReader;
use segpix::input::{load_masks, parse_palette_text};
use segpix::{required_mask_dims, Generator};
use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Convert an image to pixel art using per-subject segmentation masks and palettes
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path
    img: PathBuf,

    /// Segmentation mask; the subject name is the file stem (repeatable)
    #[arg(short, long = "mask")]
    masks: Vec<PathBuf>,

    /// Palette file with lines like `skin: #FFCCAA, #EEBB99`
    #[arg(short, long)]
    palettes: PathBuf,

    /// Side of the square block that becomes one output pixel
    #[arg(short, long)]
    block_size: u32,

    /// Output PNG path
    #[arg(short, long, default_value = "pixel_art.png")]
    output: PathBuf,

    /// Process rows on a single thread
    #[arg(long)]
    single_threaded: bool,
}

fn png_path(path: &Path) -> PathBuf {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".png");
        PathBuf::from(name)
    }
}

/// Prefixes an error with the file it came from.
fn at<E: Display>(path: &Path) -> impl FnOnce(E) -> String + '_ {
    move |e| format!("{}: {e}", path.display())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let original = ImageReader::open(&args.img)
        .map_err(at(&args.img))?
        .decode()
        .map_err(at(&args.img))?
        .to_rgba8();
    let required = required_mask_dims(original.width(), original.height(), args.block_size)?;
    info!(
        width = original.width(),
        height = original.height(),
        "required mask size: {}x{}",
        required.0,
        required.1
    );

    let loaded = load_masks(&args.masks, required);
    for e in &loaded.errors {
        warn!("mask skipped: {e}");
    }
    if !args.masks.is_empty() && loaded.masks.is_empty() {
        return Err("no segmentation mask could be loaded".into());
    }

    let text = fs::read_to_string(&args.palettes).map_err(at(&args.palettes))?;
    let palettes = parse_palette_text(&text);
    for subject in loaded.masks.names() {
        if !palettes.contains(subject) {
            warn!(subject, "no palette for mask, the combined palette will be used");
        }
    }

    let art = Generator::new(args.block_size)
        .parallel(!args.single_threaded)
        .on_progress(|percent| info!("progress: {percent}%"))
        .generate(&original, &loaded.masks, &palettes)?;

    let output = png_path(&args.output);
    art.save(&output).map_err(at(&output))?;
    info!("saved {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn args(img: PathBuf, palettes: PathBuf, output: PathBuf) -> Args {
        Args {
            img,
            masks: vec![],
            palettes,
            block_size: 2,
            output,
            single_threaded: true,
        }
    }

    #[test]
    fn png_extension_is_appended() {
        assert_eq!(png_path(Path::new("out.PNG")), PathBuf::from("out.PNG"));
        assert_eq!(png_path(Path::new("out")), PathBuf::from("out.png"));
        assert_eq!(png_path(Path::new("out.jpg")), PathBuf::from("out.jpg.png"));
    }

    #[test]
    fn errors_name_the_file_that_failed() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("photo.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(&img)
            .unwrap();
        let palettes = dir.path().join("missing.txt");
        let output = dir.path().join("art.png");

        let err = run(&args(img.clone(), palettes.clone(), output.clone()))
            .unwrap_err()
            .to_string();
        assert!(err.starts_with(&palettes.display().to_string()), "{err}");
        assert!(!err.contains("photo.png"), "{err}");

        let missing_img = dir.path().join("nope.png");
        let err = run(&args(missing_img.clone(), palettes, output))
            .unwrap_err()
            .to_string();
        assert!(err.starts_with(&missing_img.display().to_string()), "{err}");
    }

    #[test]
    fn save_errors_name_the_output() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("photo.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(&img)
            .unwrap();
        let palettes = dir.path().join("palettes.txt");
        fs::write(&palettes, "skin: #FFCCAA\n").unwrap();
        let output = dir.path().join("no_such_dir").join("art.png");

        let err = run(&args(img, palettes, output.clone()))
            .unwrap_err()
            .to_string();
        assert!(err.starts_with(&output.display().to_string()), "{err}");
    }
}
