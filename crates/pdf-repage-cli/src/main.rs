use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_repage::{
    BookletOptions, CancelToken, CompressionSettings, LopdfBackend, PaperFormat, Progress,
    ReadingDirection, SaveOptions, Session, SplitMode,
};
use std::path::PathBuf;

mod edit;

use edit::Edit;

#[derive(Parser)]
#[command(name = "repage", about = "Reorder, rotate and impose PDF pages", version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit pages and write them out one page per page
    Export {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Impose pages as a 2-up saddle-stitched booklet
    Booklet {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        save: SaveArgs,

        /// Output paper size (landscape)
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Reading direction of the bound booklet
        #[arg(long, default_value = "ltr", value_enum)]
        direction: DirectionArg,

        /// Split into parts of this many sheets
        #[arg(long, conflicts_with = "auto_split")]
        sheets_per_part: Option<usize>,

        /// Split automatically when the booklet gets too thick to fold
        #[arg(long)]
        auto_split: bool,

        /// Load booklet options from a JSON file (overrides paper/direction/split)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input PDF or image file(s), concatenated in order
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output PDF file
    #[arg(short, long)]
    output: PathBuf,

    /// Page edit applied before output, in order
    /// (rotate:<pages>:<deg>, delete:<pages>, move:<pages>:<target>)
    #[arg(long = "op")]
    ops: Vec<Edit>,
}

#[derive(Args)]
struct SaveArgs {
    /// Re-compress embedded images
    #[arg(long, value_enum)]
    compress: Option<CompressArg>,

    /// JPEG quality (1-100), overrides the preset
    #[arg(long, requires = "compress")]
    quality: Option<u8>,

    /// Largest image side in pixels, overrides the preset
    #[arg(long, requires = "compress")]
    max_side: Option<u32>,
}

impl SaveArgs {
    fn to_options(&self) -> SaveOptions {
        match self.compress {
            None => SaveOptions::default(),
            Some(preset) => {
                let mut settings = CompressionSettings::from(preset);
                if let Some(quality) = self.quality {
                    settings.quality = quality;
                }
                if let Some(max_side) = self.max_side {
                    settings.max_side = max_side;
                }
                SaveOptions::compressed(settings)
            }
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Ltr,
    Rtl,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressArg {
    Web,
    Print,
}

impl From<PaperArg> for PaperFormat {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
        }
    }
}

impl From<DirectionArg> for ReadingDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ltr => Self::Ltr,
            DirectionArg::Rtl => Self::Rtl,
        }
    }
}

impl From<CompressArg> for CompressionSettings {
    fn from(arg: CompressArg) -> Self {
        match arg {
            CompressArg::Web => Self::web(),
            CompressArg::Print => Self::print(),
        }
    }
}

/// How the booklet split is chosen
enum SplitChoice {
    Fixed(SplitMode),
    Auto,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match cli.command {
        Commands::Export { input, save } => {
            let save_options = save.to_options();
            save_options.validate()?;

            let output = input.output.clone();
            let written = tokio::task::spawn_blocking(move || -> Result<usize> {
                let session = open_and_edit(&input)?;
                let written = session
                    .export_flat(&input.output, &save_options, &mut log_progress, &CancelToken::new())
                    .with_context(|| format!("Failed to write {}", input.output.display()))?;
                Ok(written)
            })
            .await??;

            println!("Exported {} page(s) → {}", written, output.display());
        }

        Commands::Booklet {
            input,
            save,
            paper,
            direction,
            sheets_per_part,
            auto_split,
            config,
            stats_only,
        } => {
            let save_options = save.to_options();
            save_options.validate()?;

            let (options, split) = match config {
                Some(path) => {
                    let options = BookletOptions::load(&path)
                        .await
                        .with_context(|| format!("Failed to load config {}", path.display()))?;
                    (options, SplitChoice::Fixed(options.split))
                }
                None => {
                    let options = BookletOptions {
                        paper: paper.into(),
                        direction: direction.into(),
                        split: sheets_per_part.map_or(SplitMode::Single, SplitMode::BySheets),
                    };
                    let split = if auto_split {
                        SplitChoice::Auto
                    } else {
                        SplitChoice::Fixed(options.split)
                    };
                    (options, split)
                }
            };
            options.validate()?;

            let output = input.output.clone();
            let parts = tokio::task::spawn_blocking(move || -> Result<Option<Vec<PathBuf>>> {
                let mut session = open_and_edit(&input)?;

                let options = BookletOptions {
                    split: match split {
                        SplitChoice::Fixed(mode) => mode,
                        SplitChoice::Auto => {
                            BookletOptions::recommended_for(session.sequence().len()).split
                        }
                    },
                    ..options
                };

                let stats = session.statistics(&options)?;
                println!("Booklet Statistics:");
                println!("  Source pages: {}", stats.source_pages);
                println!("  Signatures: {}", stats.signatures);
                println!("  Sheets per signature: {:?}", stats.sheets_per_signature);
                println!("  Output sheets: {}", stats.output_sheets);
                println!("  Output pages: {}", stats.output_faces);
                println!("  Blank pages added: {}", stats.blank_pages_added);
                if stats.split_recommended {
                    println!("  Warning: signatures this thick fold badly, consider --sheets-per-part");
                }

                if stats_only {
                    return Ok(None);
                }

                let report = session.create_booklet(
                    &options,
                    Some(&input.output),
                    &save_options,
                    &mut log_progress,
                    &CancelToken::new(),
                )?;
                session
                    .export_flat(&input.output, &save_options, &mut log_progress, &CancelToken::new())
                    .with_context(|| format!("Failed to write {}", input.output.display()))?;
                Ok(Some(report.parts))
            })
            .await??;

            if let Some(parts) = parts {
                println!("Booklet → {}", output.display());
                for part in parts {
                    println!("  Part → {}", part.display());
                }
            }
        }
    }

    Ok(())
}

fn open_and_edit(input: &InputArgs) -> Result<Session<LopdfBackend>> {
    let mut session = Session::new(LopdfBackend::new());
    session
        .open(&input.input, &mut log_progress, &CancelToken::new())
        .context("Failed to load input files")?;

    for (index, op) in input.ops.iter().enumerate() {
        op.apply(&mut session)
            .with_context(|| format!("Edit #{} ({:?}) failed", index + 1, op))?;
    }
    if session.sequence().is_empty() {
        anyhow::bail!("No pages left after edits");
    }
    log::debug!(
        "{} page(s) ready for {}",
        session.sequence().len(),
        input.output.display()
    );
    Ok(session)
}

fn log_progress(progress: Progress) {
    log::debug!(
        "{}: {}/{}",
        progress.operation,
        progress.current,
        progress.total
    );
}
