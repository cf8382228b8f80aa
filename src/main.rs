// Console front-end for the aggregation core.
//
// - Option [1] loads and normalizes the EV registration CSV.
// - Option [2] runs every chart aggregation under the default filter,
//   previews the tables, and exports chart-ready CSV/JSON files.

use chrono::Datelike;
use ev_insights::adapter;
use ev_insights::facade::Dashboard;
use ev_insights::filter::{FilterConfig, RecencyWindow};
use ev_insights::{loader, output, util};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;

const DATASET_PATH: &str = "Electric_Vehicle_Population_Data.csv";
const DATASET_ID: &str = "ev-population";

static DASHBOARD: Lazy<Mutex<Dashboard>> = Lazy::new(|| Mutex::new(Dashboard::new()));

fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load() {
    match loader::read_raw_rows(DATASET_PATH) {
        Ok((rows, report)) => {
            let mut dash = DASHBOARD.lock().unwrap();
            let kept = dash.reload_raw(DATASET_ID, &rows);
            println!(
                "Processing dataset... ({} rows read, {} normalized records)",
                util::format_int(report.total_rows as i64),
                util::format_int(kept as i64)
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    util::format_int(report.parse_errors as i64)
                );
            }
            println!();
        }
        Err(e) => {
            eprintln!("Failed to load file: {}. Check the path and retry.\n", e);
        }
    }
}

fn handle_generate_charts() {
    let dash = DASHBOARD.lock().unwrap();
    if !dash.is_loaded(DATASET_ID) {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    }

    println!("Generating chart data...\n");
    let config = FilterConfig::default();
    let reference_year = chrono::Utc::now().year();

    let trend = dash.yearly_trend(DATASET_ID, &config);
    if let Err(e) = output::write_csv("chart_yearly_trend.csv", &trend) {
        eprintln!("Write error: {}", e);
    }
    println!("Yearly BEV/PHEV Registrations");
    output::preview_table_rows(&trend, 5);

    let shares = dash.type_share(DATASET_ID, &config);
    if let Err(e) = output::write_csv("chart_market_share.csv", &shares) {
        eprintln!("Write error: {}", e);
    }
    println!("Market Share by Vehicle Type");
    output::preview_table_rows(&shares, 2);

    let makes = dash.top_makes(DATASET_ID, &config, 10);
    if let Err(e) = output::write_csv("chart_top_makes.csv", &makes) {
        eprintln!("Write error: {}", e);
    }
    println!("Top 10 Manufacturers");
    output::preview_table_rows(&makes, 5);

    let histogram = dash.range_histogram(DATASET_ID, &config, RecencyWindow::All, reference_year);
    if let Err(e) = output::write_csv("chart_range_histogram.csv", &histogram) {
        eprintln!("Write error: {}", e);
    }
    println!("Electric Range Distribution");
    output::preview_table_rows(&histogram, 6);

    let providers = dash.top_providers(DATASET_ID, &config, 5);
    if let Err(e) = output::write_csv("chart_top_providers.csv", &providers) {
        eprintln!("Write error: {}", e);
    }
    println!("Top 5 Electric Providers");
    output::preview_table_rows(&providers, 5);

    // Renderer-facing series bundle plus the KPI summary.
    let mut series = adapter::trend_series(&trend);
    series.push(adapter::share_series(&shares));
    series.push(adapter::ranking_series(&makes));
    series.push(adapter::histogram_series(&histogram));
    if let Err(e) = output::write_json("chart_series.json", &series) {
        eprintln!("Write error: {}", e);
    }

    let summary = dash.fleet_summary(DATASET_ID, &config);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "Summary: {} vehicles, {} makes, {} counties, BEV share {}%",
        util::format_int(summary.total_vehicles as i64),
        util::format_int(summary.distinct_makes as i64),
        util::format_int(summary.distinct_counties as i64),
        summary.bev_share_pct
    );
    println!("(Chart data exported to chart_*.csv, chart_series.json, summary.json)\n");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    loop {
        println!("EV Insights");
        println!("[1] Load the dataset");
        println!("[2] Generate chart data\n");
        match read_choice().as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                handle_generate_charts();
                if !prompt_back_to_menu() {
                    println!("Exiting.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}
