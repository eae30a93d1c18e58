//! Screening a snapshot stored on disk.

use chrono::Duration;
use deepvalue_data::{CsvFundamentals, CsvPriceDirectory, load_names};
use deepvalue_screen::{ScreenConfig, ScreenPipeline, Stage};
use deepvalue_traits::Date;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn as_of() -> Date {
    Date::from_ymd_opt(2024, 6, 28).unwrap()
}

fn write_prices(dir: &Path, ticker: &str, amplitude: f64) {
    let mut csv = String::from("date,close\n");
    for i in (0..300).rev() {
        let date = as_of() - Duration::days(i);
        let shape = [0.0, 1.0, -1.0, 0.5, -0.5][(i % 5) as usize];
        writeln!(csv, "{date},{:.4}", 30.0 * (1.0 + amplitude * shape)).unwrap();
    }
    fs::write(dir.join(format!("{ticker}.csv")), csv).unwrap();
}

#[tokio::test]
async fn test_screen_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("fundamentus.csv");
    fs::write(
        &snapshot,
        "papel;cotacao;liq2m;patrliq;pvp;evebit;pl\n\
         PETR3;36,10;5.000.000,00;400.000.000.000;1,10;3,00;4,10\n\
         PETR4;38,50;8.000.000,00;400.000.000.000;1,20;3,20;4,40\n\
         VALE3;61,20;100.000.000,00;190.000.000.000;1,40;4,50;6,00\n\
         WEGE3;40,10;20.000.000,00;18.000.000.000;8,50;20,00;30,00\n\
         MGLU3;1,80;1.000.000,00;12.000.000.000;2,00;25,00;-12,00\n",
    )
    .unwrap();

    let prices_dir = dir.path().join("prices");
    fs::create_dir(&prices_dir).unwrap();
    write_prices(&prices_dir, "PETR3", 0.02);
    write_prices(&prices_dir, "PETR4", 0.02);
    write_prices(&prices_dir, "VALE3", 0.015);
    write_prices(&prices_dir, "WEGE3", 0.01);

    let names_path = dir.path().join("names.csv");
    fs::write(&names_path, "ticker,name\nVALE3,Vale S.A.\n").unwrap();

    let config = ScreenConfig {
        volatility_cut: None,
        lookup_names: true,
        ..ScreenConfig::zscore_ranking()
    };
    let pipeline = ScreenPipeline::new(
        config,
        CsvFundamentals::new(&snapshot).with_separator(b';'),
        CsvPriceDirectory::new(&prices_dir),
    )
    .unwrap()
    .with_names(load_names(&names_path, b',').unwrap());

    let report = pipeline.run(as_of()).await.unwrap();

    assert_eq!(report.remaining_after(Stage::Normalized), Some(5));
    assert_eq!(report.remaining_after(Stage::Deduplicated), Some(4));
    assert_eq!(report.remaining_after(Stage::Liquidity), Some(3));
    assert_eq!(report.sentinel_count, 0);

    let tickers = report.ranking.tickers();
    assert_eq!(tickers.len(), 3);
    assert!(tickers.contains(&"PETR4".to_string()));
    // WEGE3 is the most expensive on both factors
    assert_eq!(tickers[2], "WEGE3");

    let vale = report
        .ranking
        .iter()
        .find(|e| e.ticker == "VALE3")
        .unwrap();
    assert_eq!(vale.name, "Vale S.A.");
}
