use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use pileup_track::alignment::{AlignedRead, AlignmentReader, RawRead};
use pileup_track::config::TrackConfig;
use pileup_track::reference::ReferenceGenome;
use pileup_track::region::{Region, VisibleRange};
use pileup_track::viewer::{svg, App, ElementStore, PileupTrack, Size};

#[derive(Parser)]
#[command(
    name = "pileup-track",
    about = "Pileup viewer for aligned reads with stable row layout",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Path to BAM file (must be sorted and indexed)
    #[arg(short, long)]
    bam: PathBuf,

    /// Path to reference FASTA file
    #[arg(short, long)]
    reference: PathBuf,

    /// Region to show (format: chr:start-end, 1-based inclusive)
    #[arg(short = 'L', long)]
    region: String,

    /// Prefix added to read contig names before looking up the reference (e.g. "chr")
    #[arg(long)]
    contig_prefix: Option<String>,
}

impl InputArgs {
    fn track_config(&self, base: TrackConfig) -> TrackConfig {
        TrackConfig {
            contig_prefix: self.contig_prefix.clone(),
            ..base
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive TUI viewer for a region
    View {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Lay out a region and write it as SVG
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Width of the drawing in pixels
        #[arg(short, long, default_value = "1000")]
        width: u32,

        /// Horizontal pan in pixels
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset_px: i64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the row assigned to every read, with its mismatches
    Layout {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn load_data(input: &InputArgs) -> Result<(Region, ReferenceGenome, Vec<AlignedRead>)> {
    let region: Region = input
        .region
        .parse()
        .context("failed to parse region")?;

    let reference = ReferenceGenome::from_file(&input.reference)?;
    let reads = AlignmentReader::read_bam(&input.bam, &region)?;

    Ok((region, reference, reads))
}

fn source_id(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match cli.command {
        Commands::View { input } => {
            let (region, reference, reads) = load_data(&input)?;
            println!("Loaded {} reads in region {}", reads.len(), region);

            let config = input.track_config(TrackConfig::terminal());
            let mut app = App::new(
                &source_id(&input.bam),
                VisibleRange::from(&region),
                reads,
                reference,
                config,
            );
            app.run_tui()?;
        }

        Commands::Render {
            input,
            width,
            offset_px,
            output,
        } => {
            let (region, reference, reads) = load_data(&input)?;
            let mut range = VisibleRange::from(&region);
            range.offset_px = offset_px;

            let mut track = PileupTrack::new(input.track_config(TrackConfig::default()));
            let mut store = ElementStore::new();
            track.set_source(&source_id(&input.bam), &mut store);
            track.update(&reads, Some(&range), Size::new(width, 1), &reference, &mut store);

            let height = (track.content_height().ceil() as u32).max(1);
            let doc = svg::document(&store, track.config(), width, height);
            match output {
                Some(path) => {
                    svg::write(&path, &doc)?;
                    info!("wrote {} reads in {} rows to {}", store.len(), track.session().row_count(), path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{doc}").context("failed to write SVG to stdout")?;
                }
            }
        }

        Commands::Layout { input } => {
            let (region, reference, reads) = load_data(&input)?;
            let mut track = PileupTrack::new(input.track_config(TrackConfig::default()));
            let mut store = ElementStore::new();
            track.set_source(&source_id(&input.bam), &mut store);
            track.update(
                &reads,
                Some(&VisibleRange::from(&region)),
                Size::new(1000, 1),
                &reference,
                &mut store,
            );

            println!(
                "{:<40} {:>4} {:>6} {:>12} {:>12} {:>10}",
                "Read", "Row", "Strand", "Start", "End", "Mismatches"
            );
            println!("{}", "-".repeat(89));
            for visual in track.displayed() {
                let interval = visual.interval();
                println!(
                    "{:<40} {:>4} {:>6} {:>12} {:>12} {:>10}",
                    visual.read.name,
                    visual.row,
                    visual.read.strand_char(),
                    interval.start + 1,
                    interval.stop,
                    visual.mismatches.len(),
                );
            }
            println!(
                "\n{} reads in {} rows over {}",
                track.displayed().len(),
                track.session().row_count(),
                region
            );
        }
    }

    Ok(())
}
