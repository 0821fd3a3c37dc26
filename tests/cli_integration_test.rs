//! CLI integration tests for the screen, universe and validate commands.
//!
//! Tests cover:
//! - Screen pipeline with MockPriceDataPort (filter, cap, fetch, rank, export)
//! - Universe pipeline (merge, country filter, market suffixes)
//! - Full commands over real INI, universe and price files on disk

mod common;

use clap::Parser;
use common::*;
use peascreen::adapters::csv_export_adapter::CsvExportAdapter;
use peascreen::adapters::file_config_adapter::FileConfigAdapter;
use peascreen::cli::{self, Cli, ScreenSettings};
use peascreen::domain::country::CountryPolicy;
use peascreen::domain::screen::{ContractionThresholds, ScreenMode, TrendThresholds};
use peascreen::domain::snapshot::IndicatorParams;
use peascreen::domain::table::RESULT_COLUMNS;
use peascreen::ports::fundamentals_port::NoFundamentals;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn settings(mode: ScreenMode) -> ScreenSettings {
    ScreenSettings {
        params: IndicatorParams::default(),
        mode,
        policy: CountryPolicy::AcceptedOnly,
        max_tickers: 400,
        columns: RESULT_COLUMNS.to_vec(),
        start_date: date(2023, 1, 1),
        end_date: date(2024, 12, 31),
    }
}

fn output_tickers(path: &Path) -> Vec<String> {
    let content = fs::read_to_string(path).unwrap();
    content
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap_or_default().to_string())
        .collect()
}

mod pipeline_mock {
    use super::*;

    #[test]
    fn trend_screen_filters_countries_and_ranks() {
        let mock = MockPriceDataPort::new()
            .with_bars("AAA", zigzag_bars("AAA", 200, 50.0, 0.1))
            .with_bars("BBB", zigzag_bars("BBB", 200, 50.0, 0.1))
            .with_bars("CCC", zigzag_bars("CCC", 200, 80.0, -0.1));
        let rows = vec![
            row("CCC", "DE"),
            row("AAA", "FR"),
            row("BBB", "US"),
            row("DDD", "FR"),
        ];

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("results.csv");
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            rows,
            &settings(ScreenMode::Trend(TrendThresholds::default())),
            &output,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output_tickers(&output), vec!["AAA", "CCC"]);
        assert!(!mock.requested.borrow().contains(&"BBB".to_string()));
    }

    #[test]
    fn contraction_screen_keeps_only_calm_tail() {
        let mock = MockPriceDataPort::new()
            .with_bars("SQZ", squeeze_bars("SQZ", 200, 30))
            .with_bars("WILD", squeeze_bars("WILD", 200, 0));
        let rows = vec![row("WILD", "NL"), row("SQZ", "BE")];

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("squeeze.csv");
        let mut s = settings(ScreenMode::Contraction(ContractionThresholds::default()));
        s.columns = vec!["ticker", "bbw_pct", "atr_pct", "sigma20_pct", "score"];

        let code = cli::run_screen_pipeline(&mock, &NoFundamentals, &CsvExportAdapter, rows, &s, &output);

        assert_eq!(code, ExitCode::SUCCESS);
        let content = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ticker,bbw_pct,atr_pct,sigma20_pct,score");
        assert_eq!(lines.len(), 2);

        let cells: Vec<f64> = lines[1]
            .split(',')
            .skip(1)
            .map(|c| c.parse().unwrap())
            .collect();
        assert!(lines[1].starts_with("SQZ,"));
        assert!(cells[0] <= 20.0);
        assert!(cells[1] <= 2.0);
        assert!(cells[2] <= 2.5);
    }

    #[test]
    fn ticker_cap_applies_before_fetch() {
        let mock = MockPriceDataPort::new();
        let rows = vec![row("A1", "FR"), row("A2", "FR"), row("A3", "FR")];
        let mut s = settings(ScreenMode::Trend(TrendThresholds::default()));
        s.max_tickers = 2;

        let dir = tempfile::TempDir::new().unwrap();
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            rows,
            &s,
            &dir.path().join("out.csv"),
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(*mock.requested.borrow(), vec!["A1", "A2"]);
    }

    #[test]
    fn failing_tickers_are_skipped() {
        let mock = MockPriceDataPort::new()
            .with_error("BAD", "connection reset")
            .with_bars("AAA", zigzag_bars("AAA", 200, 50.0, 0.1));
        let rows = vec![row("BAD", "FR"), row("AAA", "FR")];

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("out.csv");
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            rows,
            &settings(ScreenMode::Trend(TrendThresholds::default())),
            &output,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output_tickers(&output), vec!["AAA"]);
    }

    #[test]
    fn empty_universe_after_filter_writes_nothing() {
        let mock = MockPriceDataPort::new();
        let rows = vec![row("IBM", "US"), row("NESN", "CH")];

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("out.csv");
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            rows,
            &settings(ScreenMode::Trend(TrendThresholds::default())),
            &output,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!output.exists());
        assert!(mock.requested.borrow().is_empty());
    }

    #[test]
    fn no_passing_rows_writes_nothing() {
        let mock = MockPriceDataPort::new().with_bars("WILD", squeeze_bars("WILD", 200, 0));
        let rows = vec![row("WILD", "FR")];

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("out.csv");
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            rows,
            &settings(ScreenMode::Contraction(ContractionThresholds::default())),
            &output,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!output.exists());
    }

    #[test]
    fn export_failure_maps_to_exit_code() {
        let mock = MockPriceDataPort::new().with_bars("AAA", zigzag_bars("AAA", 200, 50.0, 0.1));
        let code = cli::run_screen_pipeline(
            &mock,
            &NoFundamentals,
            &CsvExportAdapter,
            vec![row("AAA", "FR")],
            &settings(ScreenMode::Trend(TrendThresholds::default())),
            Path::new("/nonexistent/dir/out.csv"),
        );
        assert_eq!(code, ExitCode::from(6));
    }
}

mod universe_pipeline {
    use super::*;
    use peascreen::domain::universe::UniverseRow;

    #[test]
    fn writes_suffixed_universe_without_excluded_countries() {
        let rows = vec![
            UniverseRow {
                ticker: "XYZ".into(),
                exchange: "Paris".into(),
                country_code: "FR".into(),
                name: "Xyz".into(),
                ..UniverseRow::default()
            },
            UniverseRow {
                ticker: "AAPL".into(),
                exchange: "Nasdaq".into(),
                country_code: "US".into(),
                name: "Apple".into(),
                ..UniverseRow::default()
            },
        ];
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("pea_universe.csv");

        let code = cli::run_universe_pipeline(
            &CsvExportAdapter,
            rows,
            CountryPolicy::AcceptedOnly,
            &output,
        );

        assert_eq!(code, ExitCode::SUCCESS);
        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec!["ticker,exchange,country_code,name", "XYZ.PA,Paris,FR,Xyz"]
        );
    }

    #[test]
    fn empty_after_filter_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("u.csv");
        let code = cli::run_universe_pipeline(
            &CsvExportAdapter,
            vec![row("AAPL", "US")],
            CountryPolicy::AcceptedOnly,
            &output,
        );
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(!output.exists());
    }
}

mod commands {
    use super::*;

    fn run(args: &[&str]) -> ExitCode {
        let mut argv = vec!["peascreen"];
        argv.extend_from_slice(args);
        cli::run(Cli::parse_from(argv))
    }

    fn screen_fixture(universe_csv: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::TempDir::new().unwrap();
        let prices = dir.path().join("prices");
        fs::create_dir(&prices).unwrap();
        write_price_csv(&prices, &zigzag_bars("MC.PA", 200, 50.0, 0.1));
        write_price_csv(&prices, &zigzag_bars("SAP.DE", 200, 80.0, -0.1));
        write_price_csv(&prices, &zigzag_bars("AAPL", 200, 50.0, 0.1));

        let universe = dir.path().join("universe.csv");
        fs::write(&universe, universe_csv).unwrap();

        let ini = format!(
            "[universe]\npath = {}\ncountry_policy = accepted\n\n\
             [data]\nsource = csv\nprice_dir = {}\nend_date = 2024-07-18\nlookback_days = 400\n\n\
             [screen]\nmode = trend\n\n\
             [export]\ncolumns = ticker,country_code,rsi_14,score\npath = {}\n",
            universe.display(),
            prices.display(),
            dir.path().join("results.csv").display(),
        );
        let config = dir.path().join("peascreen.ini");
        fs::write(&config, ini).unwrap();
        (dir, config.display().to_string())
    }

    #[test]
    fn screen_end_to_end_with_csv_prices() {
        let (dir, config) = screen_fixture(
            "Symbol,Company,Country\nMC.PA,LVMH,France\nAAPL,Apple,United States\nSAP.DE,SAP,Germany\n",
        );

        assert_eq!(run(&["screen", "-c", &config]), ExitCode::SUCCESS);

        let results = dir.path().join("results.csv");
        let content = fs::read_to_string(&results).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ticker,country_code,rsi_14,score");
        assert_eq!(output_tickers(&results), vec!["MC.PA", "SAP.DE"]);
        assert!(lines[1].starts_with("MC.PA,FR,"));
    }

    #[test]
    fn screen_output_flag_overrides_config() {
        let (dir, config) = screen_fixture("ticker,country_code\nMC.PA,FR\n");
        let output = dir.path().join("override.csv");

        let code = run(&["screen", "-c", &config, "-o", &output.display().to_string()]);

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(output.exists());
        assert!(!dir.path().join("results.csv").exists());
    }

    #[test]
    fn screen_without_ticker_column_is_schema_error() {
        let (dir, config) = screen_fixture("Company,Country\nLVMH,France\n");
        assert_eq!(run(&["screen", "-c", &config]), ExitCode::from(4));
        assert!(!dir.path().join("results.csv").exists());
    }

    #[test]
    fn screen_dry_run_reads_nothing() {
        let (dir, config) = screen_fixture("ticker\nMC.PA\n");
        fs::remove_dir_all(dir.path().join("prices")).unwrap();
        assert_eq!(run(&["screen", "-c", &config, "--dry-run"]), ExitCode::SUCCESS);
        assert!(!dir.path().join("results.csv").exists());
    }

    #[test]
    fn screen_missing_price_dir_is_data_error() {
        let (dir, config) = screen_fixture("ticker,country_code\nMC.PA,FR\n");
        fs::remove_dir_all(dir.path().join("prices")).unwrap();
        assert_eq!(run(&["screen", "-c", &config]), ExitCode::from(3));
    }

    #[test]
    fn screen_with_header_only_fundamentals_still_runs() {
        let (dir, config) = screen_fixture("ticker,country_code\nMC.PA,FR\n");
        let fundamentals = dir.path().join("fundamentals.csv");
        fs::write(&fundamentals, "ticker,market_cap,pe_ratio\n").unwrap();
        let mut ini = fs::OpenOptions::new().append(true).open(&config).unwrap();
        writeln!(ini, "\n[fundamentals]\npath = {}", fundamentals.display()).unwrap();
        drop(ini);

        assert_eq!(run(&["screen", "-c", &config]), ExitCode::SUCCESS);
        assert_eq!(output_tickers(&dir.path().join("results.csv")), vec!["MC.PA"]);
    }

    #[cfg(feature = "sqlite")]
    fn sqlite_fixture(db: &Path) -> (tempfile::TempDir, String) {
        let dir = tempfile::TempDir::new().unwrap();
        let universe = dir.path().join("universe.csv");
        fs::write(&universe, "ticker,country_code\nMC.PA,FR\nAI.PA,FR\n").unwrap();

        let ini = format!(
            "[universe]\npath = {}\n\n\
             [data]\nsource = sqlite\nend_date = 2024-07-18\nlookback_days = 400\n\n\
             [sqlite]\npath = {}\n\n\
             [export]\npath = {}\n",
            universe.display(),
            db.display(),
            dir.path().join("results.csv").display(),
        );
        let config = dir.path().join("peascreen.ini");
        fs::write(&config, ini).unwrap();
        (dir, config.display().to_string())
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn screen_missing_price_database_is_data_error() {
        let store = tempfile::TempDir::new().unwrap();
        let db = store.path().join("does_not_exist.db");
        let (dir, config) = sqlite_fixture(&db);

        assert_eq!(run(&["screen", "-c", &config]), ExitCode::from(3));
        assert!(!db.exists());
        assert!(!dir.path().join("results.csv").exists());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn screen_price_database_without_table_is_data_error() {
        let store = tempfile::TempDir::new().unwrap();
        let db = store.path().join("empty.db");
        fs::File::create(&db).unwrap();
        let (_dir, config) = sqlite_fixture(&db);

        assert_eq!(run(&["screen", "-c", &config]), ExitCode::from(3));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn screen_end_to_end_with_sqlite_prices() {
        use peascreen::adapters::sqlite_adapter::SqliteAdapter;

        let store = tempfile::TempDir::new().unwrap();
        let db = store.path().join("prices.db");
        let (dir, config) = sqlite_fixture(&db);

        let conn = rusqlite::Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE ohlcv (ticker TEXT NOT NULL, date TEXT NOT NULL, open REAL NOT NULL,
             high REAL NOT NULL, low REAL NOT NULL, close REAL NOT NULL, volume REAL NOT NULL,
             PRIMARY KEY (ticker, date));",
        )
        .unwrap();
        drop(conn);
        let seed = FileConfigAdapter::from_string(&format!("[sqlite]\npath = {}\n", db.display()))
            .unwrap();
        SqliteAdapter::from_config(&seed)
            .unwrap()
            .insert_bars(&zigzag_bars("MC.PA", 200, 50.0, 0.1))
            .unwrap();

        assert_eq!(run(&["screen", "-c", &config]), ExitCode::SUCCESS);
        assert_eq!(output_tickers(&dir.path().join("results.csv")), vec!["MC.PA"]);
    }

    #[test]
    fn screen_invalid_config_is_config_error() {
        let ini = write_temp_ini("[screen]\nrsi_low = 80\nrsi_high = 20\n");
        let path = ini.path().display().to_string();
        assert_eq!(run(&["screen", "-c", &path]), ExitCode::from(2));
    }

    #[test]
    fn screen_missing_config_file_is_config_error() {
        assert_eq!(
            run(&["screen", "-c", "/nonexistent/peascreen.ini"]),
            ExitCode::from(2)
        );
    }

    #[test]
    fn universe_command_merges_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = dir.path().join("euronext.csv");
        fs::write(
            &first,
            "Mnémonique;Nom;Marché;Pays\nXYZ;Xyz SA;Euronext Paris;France\nIBM;IBM;NYSE;USA\n",
        )
        .unwrap();
        let second = dir.path().join("extra.csv");
        fs::write(
            &second,
            "ticker,name,exchange,isin\nXYZ,Duplicate,Paris,\nINGA,ING Groep,Euronext Amsterdam,NL0011821202\n",
        )
        .unwrap();
        let output = dir.path().join("pea_universe.csv");

        let code = run(&[
            "universe",
            "-s",
            &first.display().to_string(),
            "-s",
            &second.display().to_string(),
            "-o",
            &output.display().to_string(),
        ]);

        assert_eq!(code, ExitCode::SUCCESS);
        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec![
                "ticker,exchange,country_code,name",
                "XYZ.PA,Euronext Paris,FR,Xyz SA",
                "INGA.AS,Euronext Amsterdam,NL,ING Groep",
            ]
        );
    }

    #[test]
    fn universe_command_rejects_unknown_policy() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("u.csv");
        fs::write(&source, "ticker\nAAA\n").unwrap();
        let code = run(&[
            "universe",
            "-s",
            &source.display().to_string(),
            "--policy",
            "strict",
        ]);
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn validate_accepts_full_config() {
        let ini = write_temp_ini(
            "[universe]\ncountry_policy = exclude\nmax_tickers = 50\n\
             [data]\nsource = sqlite\nlookback_days = 365\n\
             [indicators]\nrsi_period = 10\n\
             [screen]\nmode = contraction\nbbw_threshold = 10\n",
        );
        let path = ini.path().display().to_string();
        assert_eq!(run(&["validate", "-c", &path]), ExitCode::SUCCESS);
    }

    #[test]
    fn validate_rejects_bad_window() {
        let ini = write_temp_ini("[indicators]\nsma_long = 0\n");
        let path = ini.path().display().to_string();
        assert_eq!(run(&["validate", "-c", &path]), ExitCode::from(2));
    }

    #[test]
    fn settings_columns_come_from_list() {
        let adapter =
            FileConfigAdapter::from_string("[export]\ncolumns = score , ticker,,nope\n").unwrap();
        let s = cli::build_screen_settings(&adapter, None, date(2024, 1, 1)).unwrap();
        assert_eq!(s.columns, vec!["score", "ticker"]);
    }

    #[test]
    fn settings_built_from_ini() {
        let adapter = FileConfigAdapter::from_string(
            "[screen]\nmode = squeeze\nbbw_threshold = 12\n[data]\nend_date = 2024-03-01\nlookback_days = 10\n",
        )
        .unwrap();
        let s = cli::build_screen_settings(&adapter, None, date(2030, 1, 1)).unwrap();
        assert_eq!(s.start_date, date(2024, 2, 20));
        match s.mode {
            ScreenMode::Contraction(c) => assert_eq!(c.bbw_threshold, 12.0),
            other => panic!("expected contraction, got {other:?}"),
        }
    }
}
