//! # Printard CLI
//!
//! Command-line interface for laying out printable card sheets.
//!
//! ## Usage
//!
//! ```bash
//! # List paper and card sizes
//! printard sizes
//!
//! # Show the grid for a paper/card pair
//! printard layout --paper A3 --card mini
//!
//! # Dump the draw operations a job would produce
//! printard plan deck.json
//!
//! # Render a job to PDF (or PNG)
//! printard export deck.json
//! printard export deck.json --png --dpi 150 --output preview.png
//!
//! # Run the HTTP API
//! printard serve --listen 0.0.0.0:8080
//! ```
//!
//! Set `RUST_LOG=printard=debug` for layout and render details.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use printard::{
    PrintardError,
    catalog::{self, CardSize, PaperSize},
    export::{self, ExportFormat},
    job::Job,
    layout::{self, MIN_MARGIN_MM},
    preview::DEFAULT_PREVIEW_DPI,
    render::ClipStrategy,
    server::{self, ServerConfig},
    source::SourceLoader,
};

/// Printard - Card sheet layout and export
#[derive(Parser, Debug)]
#[command(name = "printard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List paper and card sizes
    Sizes,

    /// Solve and print the grid for a paper/card pair
    Layout {
        /// Paper size name
        #[arg(long, default_value = "A4")]
        paper: PaperSize,

        /// Card size name
        #[arg(long, default_value = "poker")]
        card: CardSize,

        /// Minimum margin in millimeters
        #[arg(long, default_value_t = MIN_MARGIN_MM)]
        margin: f32,
    },

    /// Print the draw operations for a job file as JSON
    Plan {
        /// Job file
        job: PathBuf,
    },

    /// Render a job file to PDF or PNG
    Export {
        /// Job file
        job: PathBuf,

        /// Output path (defaults to layout-cards-{paper}-{card}.{ext})
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render a PNG preview instead of a PDF
        #[arg(long)]
        png: bool,

        /// PNG resolution
        #[arg(long, default_value_t = DEFAULT_PREVIEW_DPI)]
        dpi: f32,

        /// Crop image pixels instead of masking overflow
        #[arg(long)]
        crop: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), PrintardError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sizes => {
            println!("Paper sizes:");
            for paper in catalog::list_papers() {
                println!("  {:<8} {}", paper.name(), paper.label());
            }
            println!("\nCard sizes:");
            for card in catalog::list_cards() {
                println!("  {:<8} {}", card.name(), card.label());
            }
            Ok(())
        }

        Commands::Layout {
            paper,
            card,
            margin,
        } => {
            let grid = layout::solve(paper.dimensions(), card.dimensions(), margin)?;
            println!("{} on {} (margin {}mm)", card.label(), paper.label(), margin);
            println!(
                "  {} columns x {} rows = {} cards",
                grid.columns, grid.rows, grid.total_cells
            );
            println!(
                "  spacing {:.2}mm horizontal, {:.2}mm vertical",
                grid.spacing_x, grid.spacing_y
            );
            if !grid.fits() {
                println!("  warning: card is larger than the printable area");
            }
            Ok(())
        }

        Commands::Plan { job } => {
            let sheet = Job::load(&job)?.into_sheet()?;
            let loader = SourceLoader::new()?;
            let out = runtime()?.block_on(export::plan(&sheet, &loader))?;
            println!("{}", String::from_utf8_lossy(&out.bytes));
            Ok(())
        }

        Commands::Export {
            job,
            output,
            png,
            dpi,
            crop,
        } => {
            let mut sheet = Job::load(&job)?.into_sheet()?;
            if crop {
                sheet.options.strategy = ClipStrategy::CropSource;
            }
            let format = if png {
                ExportFormat::Png { dpi }
            } else {
                ExportFormat::Pdf
            };

            let loader = SourceLoader::new()?;
            let out = runtime()?.block_on(export::export(&sheet, format, &loader))?;

            let path = output.unwrap_or_else(|| PathBuf::from(&out.filename));
            std::fs::write(&path, &out.bytes)?;
            println!(
                "Wrote {} ({} of {} cards drawn)",
                path.display(),
                out.report.drawn,
                out.report.cells
            );
            for failure in &out.report.failures {
                eprintln!("  {}: {}", failure.id, failure.error);
            }
            Ok(())
        }

        Commands::Serve { listen } => {
            let config = ServerConfig {
                listen_addr: listen,
                ..Default::default()
            };
            println!("Printard HTTP server listening on http://{}/", config.listen_addr);
            runtime()?.block_on(server::serve(config))
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, PrintardError> {
    Ok(tokio::runtime::Runtime::new()?)
}
