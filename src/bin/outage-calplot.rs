use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use outage_calplot::models::{Facet, Observation};
use outage_calplot::{PlotConfig, pipeline, source, stats, storage, viz};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "outage-calplot",
    version,
    about = "Render yearly calendar heatmaps of system failures"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load failures, build the per-system calendars and draw them.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Observations file (.csv or .json) with date,facet,quantity.
    #[arg(short, long, conflicts_with = "url")]
    input: Option<PathBuf>,
    /// Feature layer URL to query instead of a file (…/FeatureServer/0).
    #[arg(long)]
    url: Option<String>,
    /// Output figure (.svg or .png).
    #[arg(short, long, default_value = "index.svg")]
    out: PathBuf,
    /// JSON config file (defaults to <config dir>/outage-calplot/config.json if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Locale for month/weekday names, e.g. lt_LT or en_US.
    #[arg(long)]
    locale: Option<String>,
    /// Year to draw (defaults to the year of --today).
    #[arg(long)]
    year: Option<i32>,
    /// Date to highlight, YYYY-MM-DD (defaults to the local date).
    #[arg(long, conflicts_with = "no_highlight")]
    today: Option<NaiveDate>,
    /// Draw no highlight box, e.g. for a past year.
    #[arg(long, default_value_t = false)]
    no_highlight: bool,
    /// Gap between cells in pixels.
    #[arg(long)]
    gap: Option<f64>,
    /// Draw the highlight box without gap compensation.
    #[arg(long, default_value_t = false)]
    no_pad: bool,
    /// TrueType font for titles and tick labels.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Also write each facet's grid as CSV into this directory.
    #[arg(long)]
    export_grids: Option<PathBuf>,
    /// Print per-facet statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn apply_overrides(cfg: &mut PlotConfig, args: &RenderArgs) {
    if let Some(locale) = &args.locale {
        cfg.locale = locale.clone();
    }
    if let Some(gap) = args.gap {
        cfg.cell_gap = gap;
    }
    if args.no_pad {
        cfg.pad_highlight = false;
    }
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
    if let Some(url) = &args.url {
        cfg.layer_url = Some(url.clone());
    }
}

fn load(cfg: &PlotConfig, args: &RenderArgs) -> Result<Vec<Observation>> {
    if let Some(path) = &args.input {
        let rows = storage::load_observations(path)?;
        info!("loaded {} observations from {}", rows.len(), path.display());
        return Ok(rows);
    }
    match &cfg.layer_url {
        Some(url) => source::Client::new(url.as_str())?.fetch(&cfg.layer_fields),
        None => bail!("no data source: pass --input or --url (or set layer_url in the config)"),
    }
}

/// Keep only characters safe in a file name.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// One export path per facet; two facets sharing a file name is an error.
fn export_paths(dir: &Path, facets: &[Facet], year: i32) -> Result<Vec<PathBuf>> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut paths = Vec::with_capacity(facets.len());
    for facet in facets {
        let file = format!("{}-{year}.csv", file_stem(&facet.name));
        if let Some(other) = seen.insert(file.to_lowercase(), &facet.name) {
            bail!(
                "systems `{other}` and `{}` would both be exported to {file}",
                facet.name
            );
        }
        paths.push(dir.join(file));
    }
    Ok(paths)
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let mut cfg = PlotConfig::load(args.config.as_deref())?;
    apply_overrides(&mut cfg, &args);
    cfg.validate()?;

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let year = args.year.unwrap_or_else(|| today.year());

    let observations = load(&cfg, &args)?;
    let labels = cfg.axis_labels().context("resolve month/weekday names")?;
    let highlight_day = (!args.no_highlight).then_some(today);
    let figure = pipeline::build_figure(&observations, &cfg, labels, highlight_day, year)
        .with_context(|| format!("build the {year} calendar (use --no-highlight for other years)"))?;

    let exports = match &args.export_grids {
        Some(dir) => Some((dir, export_paths(dir, &figure.plan.facets, year)?)),
        None => None,
    };

    viz::render(
        &figure.plan,
        &figure.grids,
        figure.highlight.as_ref(),
        &cfg,
        &args.out,
    )?;
    eprintln!("Wrote calendar to {}", args.out.display());

    if let Some((dir, paths)) = exports {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        for (path, grid) in paths.iter().zip(&figure.grids) {
            storage::save_grid_csv(grid, path)?;
        }
        eprintln!("Saved {} grids to {}", figure.grids.len(), dir.display());
    }

    if args.stats {
        let num_locale = stats::number_locale(&cfg.locale);
        for (facet, grid) in figure.plan.facets.iter().zip(&figure.grids) {
            let s = stats::facet_summary(&facet.name, grid);
            let busiest = match s.busiest {
                Some((date, v)) => format!("{date} ({})", stats::format_count(v, num_locale)),
                None => "NA".to_string(),
            };
            println!(
                "{} • {}  total={} days={} mean/day={:.2} busiest={}",
                s.facet,
                s.year,
                stats::format_count(s.total, num_locale),
                s.failure_days,
                s.mean_per_day,
                busiest
            );
        }
    }

    Ok(())
}
