//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::csv_fundamentals_adapter::CsvFundamentalsAdapter;
use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::table_csv_adapter::read_table;
use crate::domain::config_validation::{validate_screen_config, validate_universe_section};
use crate::domain::country::{filter_rows, CountryPolicy};
use crate::domain::error::ScreenerError;
use crate::domain::screen::{
    rank, screen_universe, ContractionThresholds, ScreenMode, ScreenModeKind, TrendThresholds,
};
use crate::domain::snapshot::IndicatorParams;
use crate::domain::table::{select_columns, DEFAULT_EXPORT_COLUMNS};
use crate::domain::universe::{limit, merge_universes, parse_universe, UniverseRow};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use crate::ports::fundamentals_port::{FundamentalsPort, NoFundamentals};
use crate::ports::price_data_port::PriceDataPort;

pub const DEFAULT_UNIVERSE_OUTPUT: &str = "pea_universe.csv";
pub const DEFAULT_SCREEN_OUTPUT: &str = "pea_screener_results.csv";
pub const DEFAULT_MAX_TICKERS: i64 = 400;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 260;

#[derive(Parser, Debug)]
#[command(
    name = "peascreen",
    about = "PEA-eligible stock universe builder and technical screener"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen a universe file and export the ranked results
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Universe CSV (overrides [universe] path)
        #[arg(short, long)]
        universe: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// trend or contraction (overrides [screen] mode)
        #[arg(short, long)]
        mode: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Build the four-column universe file from one or more source tables
    Universe {
        #[arg(short = 's', long = "source", required = true)]
        sources: Vec<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// accepted, exclude or all (overrides [universe] country_policy)
        #[arg(long)]
        policy: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything the screen pipeline needs besides its ports.
#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub params: IndicatorParams,
    pub mode: ScreenMode,
    pub policy: CountryPolicy,
    pub max_tickers: usize,
    pub columns: Vec<&'static str>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            universe,
            output,
            mode,
            dry_run,
        } => run_screen(
            &config,
            universe.as_deref(),
            output.as_deref(),
            mode.as_deref(),
            dry_run,
        ),
        Command::Universe {
            sources,
            config,
            output,
            policy,
        } => run_universe(&sources, config.as_deref(), output.as_deref(), policy.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(fail)
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> IndicatorParams {
    let d = IndicatorParams::default();
    let window = |key: &str, default: usize| {
        config.get_int("indicators", key, default as i64).max(1) as usize
    };
    IndicatorParams {
        rsi_period: window("rsi_period", d.rsi_period),
        sma_short: window("sma_short", d.sma_short),
        sma_long: window("sma_long", d.sma_long),
        bollinger_window: window("bollinger_window", d.bollinger_window),
        bollinger_k: config.get_double("indicators", "bollinger_k", d.bollinger_k),
        atr_window: window("atr_window", d.atr_window),
        volatility_window: window("volatility_window", d.volatility_window),
        momentum_window: window("momentum_window", d.momentum_window),
        volume_window: window("volume_window", d.volume_window),
    }
}

pub fn build_screen_mode(
    config: &dyn ConfigPort,
    mode_override: Option<&str>,
) -> Result<ScreenMode, ScreenerError> {
    let kind = match mode_override.map(str::to_string).or_else(|| config.get_string("screen", "mode")) {
        Some(name) => name
            .parse::<ScreenModeKind>()
            .map_err(|reason| ScreenerError::invalid("screen", "mode", reason))?,
        None => ScreenModeKind::Trend,
    };

    Ok(match kind {
        ScreenModeKind::Trend => {
            let d = TrendThresholds::default();
            ScreenMode::Trend(TrendThresholds {
                min_price: config.get_double("screen", "min_price", d.min_price),
                min_volume: config.get_double("screen", "min_volume", d.min_volume),
                rsi_low: config.get_double("screen", "rsi_low", d.rsi_low),
                rsi_high: config.get_double("screen", "rsi_high", d.rsi_high),
                min_market_cap: config.get_double("screen", "min_market_cap", d.min_market_cap),
            })
        }
        ScreenModeKind::Contraction => {
            let d = ContractionThresholds::default();
            ScreenMode::Contraction(ContractionThresholds {
                min_price: config.get_double("screen", "min_price", d.min_price),
                min_volume: config.get_double("screen", "min_volume", d.min_volume),
                bbw_threshold: config.get_double("screen", "bbw_threshold", d.bbw_threshold),
                atr_max: config.get_double("screen", "atr_max", d.atr_max),
                sigma_max: config.get_double("screen", "sigma_max", d.sigma_max),
            })
        }
    })
}

pub fn build_country_policy(
    config: &dyn ConfigPort,
    policy_override: Option<&str>,
) -> Result<CountryPolicy, ScreenerError> {
    match policy_override
        .map(str::to_string)
        .or_else(|| config.get_string("universe", "country_policy"))
    {
        Some(name) => name
            .parse::<CountryPolicy>()
            .map_err(|reason| ScreenerError::invalid("universe", "country_policy", reason)),
        None => Ok(CountryPolicy::AcceptedOnly),
    }
}

/// `[data] end_date` (default today) and `lookback_days` calendar days before it.
pub fn build_date_range(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ScreenerError> {
    let end_date = match config.get_string("data", "end_date") {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            ScreenerError::invalid(
                "data",
                "end_date",
                "invalid date format (expected YYYY-MM-DD)",
            )
        })?,
        None => today,
    };
    let lookback = config
        .get_int("data", "lookback_days", DEFAULT_LOOKBACK_DAYS)
        .max(1);
    Ok((end_date - Duration::days(lookback), end_date))
}

pub fn build_screen_settings(
    config: &dyn ConfigPort,
    mode_override: Option<&str>,
    today: NaiveDate,
) -> Result<ScreenSettings, ScreenerError> {
    let (start_date, end_date) = build_date_range(config, today)?;
    let requested = config.get_list("export", "columns");
    let columns = if requested.is_empty() {
        select_columns(DEFAULT_EXPORT_COLUMNS)
    } else {
        select_columns(&requested)
    };
    Ok(ScreenSettings {
        params: build_indicator_params(config),
        mode: build_screen_mode(config, mode_override)?,
        policy: build_country_policy(config, None)?,
        max_tickers: config
            .get_int("universe", "max_tickers", DEFAULT_MAX_TICKERS)
            .max(1) as usize,
        columns,
        start_date,
        end_date,
    })
}

/// Load and merge universe tables; earlier files win on duplicate tickers.
pub fn load_universe(paths: &[PathBuf]) -> Result<Vec<UniverseRow>, ScreenerError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        eprintln!("Loading universe from {}", path.display());
        let table = read_table(path)?;
        let rows = parse_universe(&table)?;
        eprintln!("  {} rows", rows.len());
        sources.push(rows);
    }
    Ok(merge_universes(sources))
}

fn apply_country_filter(rows: Vec<UniverseRow>, policy: CountryPolicy) -> Vec<UniverseRow> {
    let before = rows.len();
    let kept = filter_rows(rows, policy);
    eprintln!(
        "Country filter ({}): {} → {} tickers",
        policy,
        before,
        kept.len()
    );
    kept
}

fn run_screen(
    config_path: &Path,
    universe_override: Option<&Path>,
    output_override: Option<&Path>,
    mode_override: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_screen_config(&config) {
        return fail(e);
    }

    let settings = match build_screen_settings(&config, mode_override, Local::now().date_naive()) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let universe_path = match universe_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("universe", "path").map(PathBuf::from))
    {
        Some(p) => p,
        None => {
            return fail(ScreenerError::ConfigMissing {
                section: "universe".into(),
                key: "path".into(),
            });
        }
    };
    let output = output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("export", "path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCREEN_OUTPUT));

    if dry_run {
        print_settings(&settings, &universe_path, &output);
        eprintln!("\nDry run complete: configuration is valid");
        return ExitCode::SUCCESS;
    }

    // Stage 2: Load universe
    let rows = match load_universe(&[universe_path]) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    // Stage 3: Price source and fundamentals
    let fundamentals: Box<dyn FundamentalsPort + Sync> =
        match config.get_string("fundamentals", "path") {
            Some(path) => match CsvFundamentalsAdapter::from_file(Path::new(&path)) {
                Ok(f) if f.is_empty() => {
                    eprintln!("warning: fundamentals file {path} has no rows");
                    Box::new(NoFundamentals)
                }
                Ok(f) => {
                    eprintln!("Loaded fundamentals for {} tickers", f.len());
                    Box::new(f)
                }
                Err(e) => {
                    eprintln!("warning: fundamentals unavailable ({e})");
                    Box::new(NoFundamentals)
                }
            },
            None => Box::new(NoFundamentals),
        };

    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    match source.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;

            let data_port = match SqliteAdapter::from_config(&config) {
                Ok(a) => a,
                Err(e) => return fail(e),
            };
            run_screen_pipeline(
                &data_port,
                fundamentals.as_ref(),
                &CsvExportAdapter,
                rows,
                &settings,
                &output,
            )
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            eprintln!("error: sqlite feature is required for [data] source = sqlite");
            ExitCode::from(1)
        }
        _ => {
            let price_dir = match config.get_string("data", "price_dir") {
                Some(d) => PathBuf::from(d),
                None => {
                    return fail(ScreenerError::ConfigMissing {
                        section: "data".into(),
                        key: "price_dir".into(),
                    });
                }
            };
            let data_port = match CsvPriceAdapter::new(price_dir) {
                Ok(a) => a,
                Err(e) => return fail(e),
            };
            run_screen_pipeline(
                &data_port,
                fundamentals.as_ref(),
                &CsvExportAdapter,
                rows,
                &settings,
                &output,
            )
        }
    }
}

/// Country filter, ticker cap, fetch, indicators, scoring, ranking, export.
pub fn run_screen_pipeline(
    data_port: &dyn PriceDataPort,
    fundamentals: &(dyn FundamentalsPort + Sync),
    exporter: &dyn ExportPort,
    rows: Vec<UniverseRow>,
    settings: &ScreenSettings,
    output: &Path,
) -> ExitCode {
    // Stage 4: Country filter and cap
    let rows = apply_country_filter(rows, settings.policy);
    if rows.is_empty() {
        eprintln!("warning: universe is empty after the country filter; nothing to screen");
        return ExitCode::SUCCESS;
    }
    let rows = limit(rows, settings.max_tickers);

    // Stage 5: Fetch prices
    let tickers: Vec<String> = rows.iter().map(|r| r.ticker.clone()).collect();
    eprintln!(
        "Fetching prices for {} tickers, {} to {}",
        tickers.len(),
        settings.start_date,
        settings.end_date
    );
    let prices = data_port.fetch_many(&tickers, settings.start_date, settings.end_date);
    eprintln!("  {} tickers with data", prices.len());

    // Stage 6: Indicators, scoring, ranking
    eprintln!("Screening ({})", settings.mode.kind());
    let scored = screen_universe(&rows, &prices, &settings.params, &settings.mode, fundamentals);
    let ranked = rank(scored);
    if ranked.is_empty() {
        eprintln!("warning: no tickers passed the {} screen", settings.mode.kind());
        return ExitCode::SUCCESS;
    }
    eprintln!("  {} tickers passed", ranked.len());

    // Stage 7: Export
    match exporter.write_results(&ranked, &settings.columns, output) {
        Ok(()) => {
            eprintln!("\nResults written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn print_settings(settings: &ScreenSettings, universe: &Path, output: &Path) {
    eprintln!("\nUniverse:");
    eprintln!("  file:           {}", universe.display());
    eprintln!("  country policy: {}", settings.policy);
    eprintln!("  max tickers:    {}", settings.max_tickers);
    eprintln!("\nPrices:");
    eprintln!("  range:          {} to {}", settings.start_date, settings.end_date);
    eprintln!("  min history:    {} bars", settings.params.min_history());
    eprintln!("\nScreen:");
    match &settings.mode {
        ScreenMode::Trend(t) => {
            eprintln!("  mode:           trend");
            eprintln!("  min price:      {}", t.min_price);
            eprintln!("  min volume:     {}", t.min_volume);
            eprintln!("  RSI band:       {} to {}", t.rsi_low, t.rsi_high);
            eprintln!("  min market cap: {}", t.min_market_cap);
        }
        ScreenMode::Contraction(c) => {
            eprintln!("  mode:           contraction");
            eprintln!("  min price:      {}", c.min_price);
            eprintln!("  min volume:     {}", c.min_volume);
            eprintln!("  BBW pct max:    {}", c.bbw_threshold);
            eprintln!("  ATR% max:       {}", c.atr_max);
            eprintln!("  sigma20% max:   {}", c.sigma_max);
        }
    }
    eprintln!("\nExport:");
    eprintln!("  columns:        {}", settings.columns.join(","));
    eprintln!("  file:           {}", output.display());
}

fn run_universe(
    sources: &[PathBuf],
    config_path: Option<&Path>,
    output_override: Option<&Path>,
    policy_override: Option<&str>,
) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            let c = match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            };
            if let Err(e) = validate_universe_section(&c) {
                return fail(e);
            }
            Some(c)
        }
        None => None,
    };

    let policy = match &config {
        Some(c) => build_country_policy(c, policy_override),
        None => policy_override
            .map(|p| {
                p.parse::<CountryPolicy>()
                    .map_err(|reason| ScreenerError::invalid("universe", "country_policy", reason))
            })
            .unwrap_or(Ok(CountryPolicy::AcceptedOnly)),
    };
    let policy = match policy {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let rows = match load_universe(sources) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let output = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_UNIVERSE_OUTPUT));

    run_universe_pipeline(&CsvExportAdapter, rows, policy, &output)
}

/// Filter merged universe rows by country and write the universe file.
pub fn run_universe_pipeline(
    exporter: &dyn ExportPort,
    rows: Vec<UniverseRow>,
    policy: CountryPolicy,
    output: &Path,
) -> ExitCode {
    let rows = apply_country_filter(rows, policy);
    if rows.is_empty() {
        eprintln!("warning: universe is empty after the country filter; no file written");
        return ExitCode::SUCCESS;
    }

    match exporter.write_universe(&rows, output) {
        Ok(()) => {
            eprintln!("Universe written to: {} ({} tickers)", output.display(), rows.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_screen_config(&config) {
        return fail(e);
    }

    let settings = match build_screen_settings(&config, None, Local::now().date_naive()) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    println!("mode: {}", settings.mode.kind());
    println!("country_policy: {}", settings.policy);
    println!("max_tickers: {}", settings.max_tickers);
    println!("range: {} to {}", settings.start_date, settings.end_date);
    println!("min_history: {}", settings.params.min_history());
    println!("columns: {}", settings.columns.join(","));

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
