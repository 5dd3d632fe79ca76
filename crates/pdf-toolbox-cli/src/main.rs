//! PDF Toolbox CLI - Page-level PDF editing from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_toolbox_core::{
    AppConfig, CompressionOptions, FitMode, PagePosition, PageSizing, PdfToolbox, RgbColor,
    StandardFont, WatermarkPlacement, format_bytes, image_output_name, normalize_pdf_filename, split_part_name,
};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Parse a colour name for `--color` (black, gray, dark-red, blue).
fn parse_color(name: &str) -> std::result::Result<RgbColor, String> {
    RgbColor::from_name(name)
        .ok_or_else(|| format!("unknown color '{name}' (expected black, gray, dark-red or blue)"))
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FontOption {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl From<FontOption> for StandardFont {
    fn from(opt: FontOption) -> Self {
        match opt {
            FontOption::Helvetica => Self::Helvetica,
            FontOption::HelveticaBold => Self::HelveticaBold,
            FontOption::Courier => Self::Courier,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlacementOption {
    Center,
    Diagonal,
}

impl From<PlacementOption> for WatermarkPlacement {
    fn from(opt: PlacementOption) -> Self {
        match opt {
            PlacementOption::Center => Self::Center,
            PlacementOption::Diagonal => Self::Diagonal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageOption {
    A4,
    Original,
}

impl From<PageOption> for PageSizing {
    fn from(opt: PageOption) -> Self {
        match opt {
            PageOption::A4 => Self::A4,
            PageOption::Original => Self::Original,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FitOption {
    Contain,
    Cover,
}

impl From<FitOption> for FitMode {
    fn from(opt: FitOption) -> Self {
        match opt {
            FitOption::Contain => Self::Contain,
            FitOption::Cover => Self::Cover,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "pdf-toolbox")]
#[command(author, version, about = "Edit PDF pages locally", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, env = "PDF_TOOLBOX_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show page count and page sizes
    Info {
        input: PathBuf,
    },

    /// Keep only the given pages, in the given order
    Extract {
        input: PathBuf,
        /// Pages to keep (e.g. "1,3-5")
        #[arg(short, long)]
        pages: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove the given pages
    Delete {
        input: PathBuf,
        /// Pages to remove (e.g. "2,4")
        #[arg(short, long)]
        pages: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rearrange pages
    Reorder {
        input: PathBuf,
        /// New page order, every page exactly once (e.g. "3,1,2")
        #[arg(long)]
        order: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write one PDF per page range
    Split {
        input: PathBuf,
        /// Ranges (e.g. "1-3,4-4,7")
        #[arg(short, long)]
        ranges: String,
        /// Base name of the parts (default: input file name)
        #[arg(long)]
        base: Option<String>,
        /// Directory for the parts (default: next to the input)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Concatenate PDFs
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stamp a text watermark on every page
    Watermark {
        input: PathBuf,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        font_size: Option<f32>,
        #[arg(long)]
        opacity: Option<f32>,
        /// Rotation in degrees (diagonal placement only)
        #[arg(long)]
        rotation: Option<f32>,
        #[arg(long, value_enum)]
        placement: Option<PlacementOption>,
        #[arg(long, allow_hyphen_values = true)]
        offset_x: Option<f32>,
        #[arg(long, allow_hyphen_values = true)]
        offset_y: Option<f32>,
        #[arg(long, value_parser = parse_color)]
        color: Option<RgbColor>,
        #[arg(long, value_enum)]
        font: Option<FontOption>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add page numbers
    Number {
        input: PathBuf,
        /// Label template with {n} and {total} (e.g. "Page {n} of {total}")
        #[arg(long)]
        template: Option<String>,
        /// Position such as "bottom-right" or "top-center"
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        font_size: Option<f32>,
        #[arg(long)]
        opacity: Option<f32>,
        #[arg(long, allow_hyphen_values = true)]
        start_at: Option<i64>,
        #[arg(long, value_parser = parse_color)]
        color: Option<RgbColor>,
        #[arg(long, value_enum)]
        font: Option<FontOption>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a PNG or JPEG image into a one-page PDF
    Img2pdf {
        image: PathBuf,
        #[arg(long, value_enum)]
        page: Option<PageOption>,
        /// Margin in millimetres (0-30)
        #[arg(long)]
        margin: Option<f32>,
        #[arg(long, value_enum)]
        fit: Option<FitOption>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lossless structural compression
    Compress {
        input: PathBuf,
        /// Print before/after statistics
        #[arg(long)]
        stats: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a page list such as "1,3-5,9-7".
///
/// Spans expand in the written direction, so "9-7" yields 9, 8, 7.
fn parse_page_list(list: &str) -> Result<Vec<i64>> {
    let mut pages = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match split_span(part) {
            Some((start, end)) => {
                let start: i64 = start.trim().parse().context("Invalid page range start")?;
                let end: i64 = end.trim().parse().context("Invalid page range end")?;
                if start <= end {
                    pages.extend(start..=end);
                } else {
                    pages.extend((end..=start).rev());
                }
            }
            None => pages.push(part.parse().context(format!("Invalid page number: {part}"))?),
        }
    }
    Ok(pages)
}

/// Parse split ranges such as "1-3,4-4,7".
fn parse_ranges(list: &str) -> Result<Vec<(i64, i64)>> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|part| match split_span(part) {
            Some((start, end)) => Ok((
                start.trim().parse().context("Invalid range start")?,
                end.trim().parse().context("Invalid range end")?,
            )),
            None => {
                let page: i64 = part.parse().context(format!("Invalid range: {part}"))?;
                Ok((page, page))
            }
        })
        .collect()
}

/// Split "a-b" at the dash, leaving a leading minus sign to the number.
fn split_span(part: &str) -> Option<(&str, &str)> {
    let dash = part.get(1..)?.find('-')? + 1;
    Some((&part[..dash], &part[dash + 1..]))
}

/// Resolve where a result is written: the requested path, or
/// `<input stem>-<suffix>.pdf` next to the input. Always ends in `.pdf`.
fn output_path(requested: Option<PathBuf>, input: &Path, suffix: &str) -> PathBuf {
    match requested {
        Some(path) => {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
            path.with_file_name(normalize_pdf_filename(name))
        }
        None => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            input.with_file_name(normalize_pdf_filename(&format!("{stem}-{suffix}")))
        }
    }
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .context(format!("Failed to read {}", path.display()))
}

async fn write_output(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let size = bytes.len() as u64;
    tokio::fs::write(path, bytes)
        .await
        .context(format!("Failed to write output: {}", path.display()))?;
    info!("Wrote {} ({})", path.display(), format_bytes(size));
    Ok(())
}

/// Run an engine call on the blocking pool.
async fn run_engine<T, F>(job: F) -> Result<T>
where
    F: FnOnce(&PdfToolbox) -> pdf_toolbox_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || job(&PdfToolbox::with_lopdf()))
        .await
        .context("Engine task failed")?;
    Ok(result?)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

// CLI output is intentional
#[allow(clippy::print_stdout)]
async fn run(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Info { input } => {
            let bytes = read_input(&input).await?;
            let size = bytes.len() as u64;
            let sizes = run_engine(move |tb| {
                tb.validated_page_count(&bytes)?;
                tb.page_sizes(&bytes)
            })
            .await?;

            println!("{}: {} page(s), {}", input.display(), sizes.len(), format_bytes(size));
            for (i, page) in sizes.iter().enumerate() {
                println!("  page {:>4}: {:.2} x {:.2} pt", i + 1, page.width, page.height);
            }
        }

        Command::Extract { input, pages, output } => {
            let selection = parse_page_list(&pages)?;
            let bytes = read_input(&input).await?;
            let out = run_engine(move |tb| tb.extract(&bytes, &selection)).await?;
            let path = output_path(output, &input, "extract");
            write_output(&path, out).await?;
            println!("Extracted pages saved to: {}", path.display());
        }

        Command::Delete { input, pages, output } => {
            let selection = parse_page_list(&pages)?;
            let bytes = read_input(&input).await?;
            let out = run_engine(move |tb| tb.delete(&bytes, &selection)).await?;
            let path = output_path(output, &input, "deleted");
            write_output(&path, out).await?;
            println!("Remaining pages saved to: {}", path.display());
        }

        Command::Reorder { input, order, output } => {
            let order = parse_page_list(&order)?;
            let bytes = read_input(&input).await?;
            let out = run_engine(move |tb| tb.reorder(&bytes, &order)).await?;
            let path = output_path(output, &input, "reordered");
            write_output(&path, out).await?;
            println!("Reordered PDF saved to: {}", path.display());
        }

        Command::Split { input, ranges, base, out_dir } => {
            let ranges = parse_ranges(&ranges)?;
            let bytes = read_input(&input).await?;
            let parts = run_engine(move |tb| tb.split_by_ranges(&bytes, &ranges)).await?;

            let base = base.unwrap_or_else(|| {
                input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document")
                    .to_string()
            });
            let dir = out_dir.unwrap_or_else(|| {
                input.parent().map(Path::to_path_buf).unwrap_or_default()
            });

            let pb = progress_bar(parts.len());
            for (i, part) in parts.into_iter().enumerate() {
                let path = dir.join(split_part_name(&base, i));
                pb.set_message(path.display().to_string());
                write_output(&path, part).await?;
                pb.inc(1);
            }
            pb.finish_with_message("Split complete");
        }

        Command::Merge { inputs, output } => {
            let mut documents = Vec::with_capacity(inputs.len());
            for input in &inputs {
                documents.push(read_input(input).await?);
            }
            let out = run_engine(move |tb| tb.merge(&documents)).await?;
            let path = output_path(output, &inputs[0], "merged");
            write_output(&path, out).await?;
            println!("Merged PDF saved to: {}", path.display());
        }

        Command::Watermark {
            input,
            text,
            font_size,
            opacity,
            rotation,
            placement,
            offset_x,
            offset_y,
            color,
            font,
            output,
        } => {
            // Override config with CLI arguments
            let mut options = config.watermark;
            if let Some(text) = text {
                options.text = text;
            }
            options.font_size = font_size.unwrap_or(options.font_size);
            options.opacity = opacity.unwrap_or(options.opacity);
            options.rotation_degrees = rotation.unwrap_or(options.rotation_degrees);
            options.placement = placement.map_or(options.placement, Into::into);
            options.offset_x = offset_x.unwrap_or(options.offset_x);
            options.offset_y = offset_y.unwrap_or(options.offset_y);
            options.color = color.unwrap_or(options.color);
            options.font = font.map_or(options.font, Into::into);

            let bytes = read_input(&input).await?;
            let out = run_engine(move |tb| tb.add_watermark(&bytes, &options)).await?;
            let path = output_path(output, &input, "watermarked");
            write_output(&path, out).await?;
            println!("Watermarked PDF saved to: {}", path.display());
        }

        Command::Number {
            input,
            template,
            position,
            font_size,
            opacity,
            start_at,
            color,
            font,
            output,
        } => {
            let mut options = config.page_numbers;
            if let Some(template) = template {
                options.template = template;
            }
            if let Some(position) = position {
                options.position = PagePosition::parse(&position);
            }
            options.font_size = font_size.unwrap_or(options.font_size);
            options.opacity = opacity.unwrap_or(options.opacity);
            options.start_at = start_at.unwrap_or(options.start_at);
            options.color = color.unwrap_or(options.color);
            options.font = font.map_or(options.font, Into::into);

            let bytes = read_input(&input).await?;
            let out = run_engine(move |tb| tb.add_page_numbers(&bytes, &options)).await?;
            let path = output_path(output, &input, "numbered");
            write_output(&path, out).await?;
            println!("Numbered PDF saved to: {}", path.display());
        }

        Command::Img2pdf { image, page, margin, fit, output } => {
            let mut options = config.image;
            options.page = page.map_or(options.page, Into::into);
            options.margin_mm = margin.unwrap_or(options.margin_mm);
            options.fit = fit.map_or(options.fit, Into::into);
            let max_bytes = config.max_image_bytes;

            let file_name = image
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            let path = match output {
                Some(path) => output_path(Some(path), &image, "converted"),
                None => image.with_file_name(image_output_name(&file_name)),
            };

            let bytes = read_input(&image).await?;
            let out = run_engine(move |tb| tb.image_to_pdf(&bytes, &file_name, &options, max_bytes))
                .await?;
            write_output(&path, out).await?;
            println!("PDF saved to: {}", path.display());
        }

        Command::Compress { input, stats, output } => {
            let options = CompressionOptions {
                collect_stats: stats || config.compression.collect_stats,
            };
            let bytes = read_input(&input).await?;
            let outcome = run_engine(move |tb| tb.compress(&bytes, options)).await?;

            if let Some(stats) = outcome.stats {
                println!(
                    "{} -> {} ({:.1}% smaller), objects {} -> {}, {} duplicate stream(s) merged",
                    format_bytes(stats.original_size as u64),
                    format_bytes(stats.optimized_size as u64),
                    stats.savings_ratio() * 100.0,
                    stats.objects_before,
                    stats.objects_after,
                    stats.streams_deduplicated
                );
            }

            let path = output_path(output, &input, "compressed");
            write_output(&path, outcome.bytes).await?;
            println!("Compressed PDF saved to: {}", path.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    run(args.command, config).await
}
