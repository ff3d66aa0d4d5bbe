// Entry point and interactive CLI flow.
//
// With `--page` or `--all-pages` the requested pages are rendered once and
// the program exits. Otherwise a menu lets the analyst load the dataset,
// change the year/month selection and switch between pages.
use anyhow::Result;
use clap::Parser;
use ride_dashboard::config::Cli;
use ride_dashboard::filter::{available_months, available_years};
use ride_dashboard::output::{self, RenderOptions};
use ride_dashboard::util::month_name;
use ride_dashboard::{Dashboard, DatasetCache, Page, PageView};
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Read a single line of input after printing `prompt`. `None` once the
/// input is closed or unreadable.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    read_trimmed(&mut io::stdin().lock())
}

fn read_trimmed<R: BufRead>(input: &mut R) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Parse a comma separated selection. A blank answer is an explicit empty
/// selection; `all` picks every value in `available`.
fn parse_selection<T>(input: &str, available: &BTreeSet<T>) -> Result<BTreeSet<T>, String>
where
    T: FromStr + Ord + Clone,
{
    if input.eq_ignore_ascii_case("all") {
        return Ok(available.clone());
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(|_| format!("'{}' is not a number", s)))
        .collect()
}

fn describe_months(months: &BTreeSet<u32>) -> String {
    months
        .iter()
        .map(|m| month_name(*m).unwrap_or("?").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn show_page(dash: &Dashboard, page: Page, cli: &Cli) -> Result<Option<PageView>> {
    output::print_data_summary(&dash.summary());
    let Some(view) = dash.page(page) else {
        println!("No data available for the selected filters. Please adjust your filter selections.\n");
        return Ok(None);
    };
    output::render_page(
        &view,
        RenderOptions {
            bins: cli.bins,
            preview_rows: cli.preview_rows,
        },
    );
    if let Some(dir) = &cli.export_dir {
        output::export_page_csv(dir, &view, cli.bins)?;
    }
    Ok(Some(view))
}

fn load_dashboard(cli: &Cli) -> Option<Dashboard> {
    match DatasetCache::shared().get_or_load(&cli.data) {
        Ok(dataset) => {
            let selection = cli.selection(&dataset);
            Some(Dashboard::with_selection(dataset, selection))
        }
        Err(e) => {
            error!(error = %e, "Unable to load the dataset");
            eprintln!("Unable to load the dataset: {}", e);
            None
        }
    }
}

fn run_once(cli: &Cli, pages: &[Page]) -> Result<ExitCode> {
    let Some(dash) = load_dashboard(cli) else {
        return Ok(ExitCode::FAILURE);
    };
    let mut views = Vec::new();
    for page in pages {
        if let Some(view) = show_page(&dash, *page, cli)? {
            views.push(view);
        }
    }
    if let Some(path) = &cli.json {
        output::write_json(path, &views)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_menu(cli: &Cli) -> Result<()> {
    let mut dash: Option<Dashboard> = None;
    loop {
        println!("Ride Analytics Dashboard");
        println!("[1] Load the dataset");
        println!("[2] Select year(s)");
        println!("[3] Select month(s)");
        println!("[4] Overview");
        println!("[5] Trip Experience");
        println!("[6] Revenue");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            println!("\nExiting the program.");
            return Ok(());
        };
        match choice.as_str() {
            "0" => {
                println!("Exiting the program.");
                return Ok(());
            }
            "1" => {
                // Reloading means the file may have changed on disk.
                DatasetCache::shared().invalidate();
                dash = load_dashboard(cli);
                if let Some(d) = &dash {
                    println!("Loaded {} trips.\n", d.dataset().len());
                }
            }
            "2" | "3" | "4" | "5" | "6" => {
                let Some(d) = dash.as_mut() else {
                    println!("Error: No data loaded. Please load the dataset first (option 1).\n");
                    continue;
                };
                handle_dashboard_choice(d, &choice, cli)?;
            }
            _ => println!("Invalid choice. Please enter a number from 0 to 6.\n"),
        }
    }
}

fn handle_dashboard_choice(d: &mut Dashboard, choice: &str, cli: &Cli) -> Result<()> {
    let page = match choice {
        "2" => {
            let available = available_years(d.dataset());
            println!("Available years: {:?}", available);
            let Some(input) = read_line("Years (comma separated, 'all', blank for none): ") else {
                println!("\nSelection cancelled.\n");
                return Ok(());
            };
            match parse_selection(&input, &available) {
                Ok(years) => d.set_years(years),
                Err(e) => println!("Invalid selection: {}\n", e),
            }
            return Ok(());
        }
        "3" => {
            let available = available_months(d.dataset());
            println!("Available months: {}", describe_months(&available));
            let Some(input) = read_line("Months 1-12 (comma separated, 'all', blank for none): ")
            else {
                println!("\nSelection cancelled.\n");
                return Ok(());
            };
            match parse_selection(&input, &available) {
                Ok(months) if months.iter().all(|m| (1..=12).contains(m)) => d.set_months(months),
                Ok(_) => println!("Invalid selection: months must be between 1 and 12\n"),
                Err(e) => println!("Invalid selection: {}\n", e),
            }
            return Ok(());
        }
        "4" => Page::Overview,
        "5" => Page::TripExperience,
        _ => Page::Revenue,
    };
    if d.selection().is_empty() {
        warn!("Empty year or month selection");
    }
    if let Some(view) = show_page(d, page, cli)? {
        if let Some(path) = &cli.json {
            output::write_json(path, &view)?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the dashboard itself.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!(data = %cli.data.display(), "Starting ride dashboard");

    match cli.requested_pages() {
        Some(pages) => run_once(&cli, &pages),
        None => {
            run_menu(&cli)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parsing() {
        let available = BTreeSet::from([2023, 2024]);
        assert_eq!(
            parse_selection::<i32>("2024, 2023", &available),
            Ok(BTreeSet::from([2023, 2024]))
        );
        assert_eq!(parse_selection::<i32>("ALL", &available), Ok(available.clone()));
        assert_eq!(parse_selection::<i32>("", &available), Ok(BTreeSet::new()));
        assert!(parse_selection::<i32>("twenty", &available).is_err());
    }

    #[test]
    fn closed_input_reads_as_none() {
        let mut input = io::Cursor::new("2\n");
        assert_eq!(read_trimmed(&mut input), Some("2".to_string()));
        assert_eq!(read_trimmed(&mut input), None);
        assert_eq!(read_trimmed(&mut io::Cursor::new("")), None);
        // an empty line is still an answer, not a closed input
        assert_eq!(read_trimmed(&mut io::Cursor::new("\n")), Some(String::new()));
    }

    #[test]
    fn month_labels() {
        assert_eq!(describe_months(&BTreeSet::from([1, 3])), "January, March");
    }
}
