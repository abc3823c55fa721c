//! # Placard CLI
//!
//! Command-line interface for poster generation.
//!
//! ## Usage
//!
//! ```bash
//! # Compose one poster; prints the output file path
//! placard create --cover https://picsum.photos/800/600 \
//!     --primary "世上本没有路，走的人多了，也便成了路。" \
//!     --secondary "Hope can set you free." \
//!     --qr-link https://example.com
//!
//! # Custom layout, PNG output, printed as a data URI
//! placard create --config poster.toml --format png --base64 \
//!     --cover cover.jpg --primary "技术成就梦想" --qr qrcode.png
//!
//! # Build every job in a manifest in parallel
//! placard batch posters.toml --output out/
//!
//! # List font families, or check one
//! placard fonts
//! placard fonts --family "Noto Sans CJK SC" --font NotoSansCJK.ttc
//! ```
//!
//! Set `RUST_LOG=debug` to trace each compositing step.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use placard::{
    PosterBuilder, PosterError, PosterSpec,
    batch::{self, Job, Manifest},
    export::{self, OutputFormat},
    fetch::{FileLoader, HttpFetcher},
    text::{FaceSource, FontBook},
};

/// Placard - Poster compositor
#[derive(Parser, Debug)]
#[command(name = "placard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose a single poster
    Create {
        /// Cover image (URL or file)
        #[arg(long)]
        cover: String,

        /// Primary caption, wrapped per character
        #[arg(long)]
        primary: String,

        /// Secondary caption, wrapped per word
        #[arg(long)]
        secondary: Option<String>,

        /// Background image (URL or file); defaults to a plain canvas
        #[arg(long)]
        background: Option<String>,

        /// QR code image (URL or file)
        #[arg(long, conflicts_with = "qr_link")]
        qr: Option<String>,

        /// Link to encode as the QR code
        #[arg(long)]
        qr_link: Option<String>,

        /// Extra font file to load (repeatable)
        #[arg(long = "font", value_name = "FILE")]
        fonts: Vec<PathBuf>,

        /// Layout config (TOML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output directory (defaults to <tmp>/placard)
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Jpeg)]
        format: OutputFormat,

        /// Print a data URI instead of writing a file
        #[arg(long)]
        base64: bool,

        /// Print the draw log as JSON
        #[arg(long)]
        layout: bool,
    },

    /// Build every job in a TOML manifest
    Batch {
        /// Manifest file; relative image paths resolve against its directory
        manifest: PathBuf,

        /// Extra font file to load (repeatable)
        #[arg(long = "font", value_name = "FILE")]
        fonts: Vec<PathBuf>,

        /// Output directory (defaults to <tmp>/placard)
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Jpeg)]
        format: OutputFormat,
    },

    /// List available font families
    Fonts {
        /// Check a single family instead of listing
        #[arg(long)]
        family: Option<String>,

        /// Extra font file to load (repeatable)
        #[arg(long = "font", value_name = "FILE")]
        fonts: Vec<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PosterError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            cover,
            primary,
            secondary,
            background,
            qr,
            qr_link,
            fonts,
            config,
            output,
            format,
            base64,
            layout,
        } => {
            let spec = match config {
                Some(path) => PosterSpec::load(&path)?,
                None => PosterSpec::default(),
            };
            let book = load_fonts(&fonts)?;
            let job = Job {
                cover,
                primary,
                secondary,
                background,
                qr,
                qr_link,
            };

            let fetcher = HttpFetcher::new(HttpFetcher::DEFAULT_TIMEOUT)?;
            let request = runtime()?.block_on(job.resolve(&spec, &fetcher, &FileLoader::new()))?;
            let poster = PosterBuilder::new(&spec, &book).build(request)?;

            if layout {
                let json = serde_json::to_string_pretty(&poster.layout)
                    .map_err(|e| PosterError::Encode(format!("Layout JSON: {}", e)))?;
                println!("{}", json);
            }

            let bytes = export::encode(&poster.image, format)?;
            if base64 {
                println!("{}", export::data_uri(&bytes, format));
            } else {
                let dir = output.unwrap_or_else(export::default_output_dir);
                let path = export::write_to_dir(&dir, &bytes, format)?;
                println!("{}", path.display());
            }
        }

        Commands::Batch {
            manifest,
            fonts,
            output,
            format,
        } => {
            let Manifest { spec, jobs } = Manifest::load(&manifest)?;
            if jobs.is_empty() {
                return Err(PosterError::Config(format!(
                    "{}: no [[job]] entries",
                    manifest.display()
                )));
            }
            let book = load_fonts(&fonts)?;
            let root = manifest.parent().unwrap_or(Path::new("."));
            let loader = FileLoader::with_root(root);
            let fetcher = HttpFetcher::new(HttpFetcher::DEFAULT_TIMEOUT)?;

            println!("Building {} posters...", jobs.len());
            let requests = runtime()?.block_on(batch::resolve_all(&jobs, &spec, &fetcher, &loader));
            let dir = output.unwrap_or_else(export::default_output_dir);
            let results = batch::render_all(requests, &spec, &book, &dir, format);

            let mut failed = 0;
            for (index, result) in results.into_iter().enumerate() {
                match result {
                    Ok(path) => println!("  [{}] {}", index, path.display()),
                    Err(e) => {
                        failed += 1;
                        println!("  [{}] failed: {}", index, e);
                    }
                }
            }
            println!("Built {} of {} posters", jobs.len() - failed, jobs.len());
        }

        Commands::Fonts { family, fonts } => {
            let book = load_fonts(&fonts)?;
            match family {
                Some(family) => {
                    if !book.has_family(&family) {
                        return Err(PosterError::FontUnavailable(family));
                    }
                    println!("'{}' is available", family);
                }
                None => {
                    println!("Available font families:");
                    for name in book.families() {
                        println!("  {}", name);
                    }
                }
            }
        }
    }

    Ok(())
}

/// System fonts plus any files given with `--font`.
fn load_fonts(files: &[PathBuf]) -> Result<FontBook, PosterError> {
    let mut book = FontBook::system();
    for file in files {
        book.load_file(file)?;
    }
    Ok(book)
}

/// Runtime for image downloads. Composition itself never runs on it.
fn runtime() -> Result<tokio::runtime::Runtime, PosterError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
