use std::path::PathBuf;
use std::process::ExitCode;
#[cfg(feature = "ttf-parser")]
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use lopdf_label_sheet::content::random_id;
use lopdf_label_sheet::{
    CellContent, ContentRecord, DescriptionFormat, FileStore, LocationRecord, QrTextRecord,
    RenderOptions, Result, SheetPreset, VerticalGap, Workspace,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "label-sheet")]
#[command(author, version, about = "Print QR code label sheets at physical scale", long_about = None)]
struct Cli {
    /// File the editor state is kept in between runs
    #[arg(long, global = true, default_value = "label-sheet-store.json")]
    store: PathBuf,

    /// Which page's configuration and records to work on
    #[arg(long, global = true, value_enum, default_value_t = Page::QrCodeWithText)]
    page: Page,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Page {
    Locations,
    QrCodeWithText,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the sheet to a printable PDF
    Render {
        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
        /// Outline the page and every cell
        #[arg(long)]
        show_borders: bool,
        /// Place rows cellHeight + cellVerticalGap apart
        #[arg(long)]
        apply_vertical_gap: bool,
        /// Print descriptions verbatim instead of as Markdown
        #[arg(long)]
        plain: bool,
        /// TrueType font used to measure text when wrapping
        #[cfg(feature = "ttf-parser")]
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Replace configuration and records from an exported JSON file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Write configuration and records as JSON
    Export {
        /// Output path, defaults to the page's export file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append a record
    Add {
        /// Printed text (the location name on the locations page)
        #[arg(long)]
        text: Option<String>,
        /// QR code payload (the location URL on the locations page)
        #[arg(long)]
        qr: Option<String>,
    },

    /// Insert a copy of a record right after it
    Duplicate {
        /// Zero-based record index
        index: usize,
    },

    /// Remove a record
    Remove {
        /// Zero-based record index
        index: usize,
    },

    /// Fill the whole sheet with consecutive archive serial numbers
    GenerateAsn {
        /// First number to print
        #[arg(long, default_value_t = 1)]
        start: u32,
    },

    /// Replace the sheet configuration with a known label stock
    Preset {
        /// Preset key, e.g. herma5076
        name: String,
    },

    /// Print the configuration and the cell contents
    Show,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.page {
        Page::Locations => run::<LocationRecord>(&cli),
        Page::QrCodeWithText => run::<QrTextRecord>(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run<R: ContentRecord>(cli: &Cli) -> Result<()> {
    let store = FileStore::open(&cli.store)?;
    let mut workspace = Workspace::<R, _>::open(store)?;

    match &cli.command {
        Commands::Render {
            output,
            show_borders,
            apply_vertical_gap,
            plain,
            #[cfg(feature = "ttf-parser")]
            font,
        } => {
            let mut options = RenderOptions::default()
                .with_borders(*show_borders)
                .with_vertical_gap(if *apply_vertical_gap {
                    VerticalGap::Apply
                } else {
                    VerticalGap::Ignore
                })
                .with_description_format(if *plain {
                    DescriptionFormat::Plain
                } else {
                    DescriptionFormat::Markdown
                });
            #[cfg(feature = "ttf-parser")]
            if let Some(font) = font {
                let metrics = lopdf_label_sheet::TtfFontMetrics::new(&std::fs::read(font)?)?;
                options = options.with_font_metrics(Arc::new(metrics));
            }

            let bytes = workspace.render_pdf(&options)?;
            std::fs::write(output, bytes)?;
            info!("Wrote {}", output.display());
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(file)?;
            workspace.import_json(&json)?;
        }
        Commands::Export { output } => {
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(R::KIND.export_file_name()));
            std::fs::write(&path, workspace.export_json()?)?;
            info!("Exported {} records to {}", workspace.records().len(), path.display());
        }
        Commands::Add { text, qr } => {
            let index = workspace.push_record(R::from_parts(text.clone(), qr.clone(), random_id()))?;
            info!("Added record {index}");
        }
        Commands::Duplicate { index } => workspace.duplicate_record(*index)?,
        Commands::Remove { index } => {
            workspace.remove_record(*index)?;
        }
        Commands::GenerateAsn { start } => workspace.generate_asns(*start)?,
        Commands::Preset { name } => workspace.apply_preset(SheetPreset::from_key(name)?)?,
        Commands::Show => show(&workspace),
    }

    Ok(())
}

fn show<R: ContentRecord, S: lopdf_label_sheet::KeyValueStore>(workspace: &Workspace<R, S>) {
    let config = workspace.config();
    println!(
        "{} x {} cells of {} x {} {} on a {} x {} {} page",
        config.columns,
        config.rows,
        config.cell_width,
        config.cell_height,
        config.unit.as_str(),
        config.page_width,
        config.page_height,
        config.unit.as_str(),
    );

    let grid = workspace.rendered_grid();
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            match grid.get(row, column) {
                Some(CellContent::QrWithDescription {
                    qr_code_text,
                    description,
                }) => println!("[{row},{column}] {description:?} -> {qr_code_text:?}"),
                _ => println!("[{row},{column}] (empty)"),
            }
        }
    }

    let hidden = workspace.records().len().saturating_sub(grid.len());
    if hidden > 0 {
        println!("{hidden} records do not fit on the sheet");
    }
}
