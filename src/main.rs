use clap::{Parser, Subcommand};
use lan_file_distributor::config::{self, ServerConfig};
use lan_file_distributor::output;
use lan_file_distributor::repository::FileRepository;
use lan_file_distributor::types::{EncodedArtifact, ImageArtifact};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that return images.
#[derive(clap::Args, Clone)]
struct ImageArgs {
    /// Target width in pixels (0 = derive from height; both 0 = native size)
    #[arg(long, default_value_t = 0)]
    width: u32,

    /// Target height in pixels (0 = derive from width; both 0 = native size)
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// Directory the encoded JPEGs are written to
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

#[derive(Parser)]
#[command(name = "lan-file-distributor")]
#[command(about = "Serve resized, upright images from a shared file tree")]
#[command(long_about = "\
Serve resized, upright images from a shared file tree

Paths are logical: '/holidays/IMG_0042.jpg' names <root>/holidays/IMG_0042.jpg.
Paths that climb out of the root are refused.

Sizing (--width / --height):
  both 0     native size, upright (no resampling)
  one 0      derived from the other, keeping the aspect ratio
  both set   exactly that size

Accepted formats: JPEG, PNG, TIFF, WebP. EXIF orientation is applied before
resizing. Output is always JPEG.

Environment: NAS_MOUNT_PATH sets the root, NAS_PATH the default folder.
Run 'lan-file-distributor gen-config' to generate a documented config.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to config.toml (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Share root, overriding config and environment
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every entry of a folder
    List {
        /// Logical folder (default folder when omitted)
        folder: Option<String>,
    },
    /// List the logical paths of the images in a folder
    Paths {
        /// Logical folder (default folder when omitted)
        folder: Option<String>,
    },
    /// Fetch one image
    Get {
        path: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Fetch several images at once; fails if any of them fails
    Batch {
        #[arg(required = true)]
        paths: Vec<String>,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Fetch random images from a folder
    Random {
        /// Logical folder (default folder when omitted)
        folder: Option<String>,
        /// Number of images (config `random.default_count` when omitted)
        #[arg(long)]
        count: Option<usize>,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// One written image, as printed by `--json`.
#[derive(Serialize)]
struct WrittenImage<'a> {
    #[serde(flatten)]
    artifact: &'a EncodedArtifact,
    output: &'a Path,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.root = root;
        config.validate()?;
    }
    tracing::debug!(root = %config.root.display(), "configuration loaded");
    init_thread_pool(&config.processing);

    let repo = FileRepository::from_config(&config);

    match cli.command {
        Command::List { folder } => {
            let folder = folder.unwrap_or_default();
            let files = repo.list_files(&folder)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                output::print_listing(&folder, &files, repo.root());
            }
        }
        Command::Paths { folder } => {
            let folder = folder.unwrap_or_default();
            let paths = repo.get_file_paths(&folder)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else {
                output::print_paths(&folder, &paths);
            }
        }
        Command::Get { path, image } => {
            let artifact = repo.get_file(&path, image.width, image.height)?;
            emit(&repo, &config, vec![artifact], &image.out, cli.json)?;
        }
        Command::Batch { paths, image } => {
            let artifacts = repo.get_files(&paths, image.width, image.height)?;
            emit(&repo, &config, artifacts, &image.out, cli.json)?;
        }
        Command::Random {
            folder,
            count,
            image,
        } => {
            let count = count.unwrap_or(config.random.default_count);
            let artifacts = repo.get_random_files(
                &folder.unwrap_or_default(),
                count,
                image.width,
                image.height,
            )?;
            emit(&repo, &config, artifacts, &image.out, cli.json)?;
        }
        // printed before configuration is loaded
        Command::GenConfig => {}
    }

    Ok(())
}

/// Encode artifacts to JPEG, write them under `out` and report them.
///
/// Files are named `NNN-<stem>.jpg` in result order, so two sources with the
/// same name never overwrite each other.
fn emit(
    repo: &FileRepository,
    config: &ServerConfig,
    artifacts: Vec<ImageArtifact>,
    out: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out)?;

    let mut encoded = Vec::with_capacity(artifacts.len());
    let mut written = Vec::with_capacity(artifacts.len());
    for (i, artifact) in artifacts.into_iter().enumerate() {
        let artifact = artifact.into_encoded(repo.backend(), config.quality())?;
        let stem = Path::new(&artifact.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let path = out.join(format!("{:0>3}-{}.jpg", i + 1, stem));
        std::fs::write(&path, &artifact.data)?;
        encoded.push(artifact);
        written.push(path);
    }

    if json {
        let records: Vec<WrittenImage> = encoded
            .iter()
            .zip(&written)
            .map(|(artifact, output)| WrittenImage { artifact, output })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_artifacts(&encoded, &written);
    }
    Ok(())
}

/// Log to stderr at a level chosen by `-v`; stdout carries results only.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
