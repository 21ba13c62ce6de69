// Only compile the UI module when the TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use std::env;
use std::path::{Path, PathBuf};

use form990_explorer::render::{dollars, dollars_cents, dollars_opt, percent_opt};
use form990_explorer::{
    filer_names, latest_grant_year, network_grant_total, summary_table, DatasetCache, FilerReport,
    SourcePaths, DEFAULT_FILER,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("report") => {
            let data_dir = arg_or_cwd(args.get(2));
            let filer = args
                .get(3..)
                .filter(|rest| !rest.is_empty())
                .map(|rest| rest.join(" "));
            run_report(&data_dir, filer.as_deref())
        }
        Some("export") => {
            let Some(out) = args.get(2) else {
                bail!("usage: form990-explorer export <out.json> [data_dir] [filer name]");
            };
            let data_dir = arg_or_cwd(args.get(3));
            let filer = args
                .get(4..)
                .filter(|rest| !rest.is_empty())
                .map(|rest| rest.join(" "));
            run_export(Path::new(out), &data_dir, filer.as_deref())
        }
        other => {
            let data_dir = other.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            run_ui_mode(&data_dir)
        }
    }
}

fn arg_or_cwd(arg: Option<&String>) -> PathBuf {
    arg.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

fn load_cache(data_dir: &Path) -> Result<DatasetCache> {
    println!("📂 Loading 990 data from {}...", data_dir.display());
    let cache = DatasetCache::load(SourcePaths::in_dir(data_dir))?;
    println!(
        "✓ Loaded {} rows across four schedules",
        cache.dataset().row_count()
    );
    Ok(cache)
}

/// Pick the selected filer: explicit choice, the default when present,
/// otherwise the first filer in the data.
fn select_filer(names: &[String], requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        let wanted = name.to_uppercase();
        if !names.contains(&wanted) {
            bail!("no filer named \"{wanted}\" in the data");
        }
        return Ok(wanted);
    }
    if names.iter().any(|n| n == DEFAULT_FILER) {
        return Ok(DEFAULT_FILER.to_string());
    }
    names
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no filers in the data"))
}

fn run_report(data_dir: &Path, filer: Option<&str>) -> Result<()> {
    let cache = load_cache(data_dir)?;
    let data = cache.dataset();

    if let Some(year) = latest_grant_year(data) {
        println!(
            "\n💵 Total grants given in the network ({}): {}",
            form990_explorer::year_component(&year),
            dollars_cents(network_grant_total(data, &year))
        );
    }

    let summary = summary_table(data);
    let names = filer_names(&summary);
    let selected = select_filer(&names, filer)?;
    let report = FilerReport::build(data, &summary, &selected);

    let (first, last) = report
        .year_range
        .clone()
        .unwrap_or_else(|| ("?".to_string(), "?".to_string()));

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{} ({first}-{last})", report.filing_org);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\nTotal Expenses by Year");
    println!(
        "{:<12} {:>15} {:>15} {:>15} {:>15}",
        "Tax Year", "Expenses", "Grants", "Contractors", "Compensation"
    );
    for row in &report.yearly {
        println!(
            "{:<12} {:>15} {:>15} {:>15} {:>15}",
            row.tax_year,
            dollars(row.total_expenses),
            dollars_opt(row.grants_given),
            dollars_opt(row.contractor_expenses),
            dollars_opt(row.compensation_filing_org),
        );
    }

    println!("\nShare of Total Expenses");
    println!(
        "{:<12} {:>10} {:>12} {:>13}",
        "Tax Year", "Grants", "Contractors", "Compensation"
    );
    for row in &report.percentages {
        println!(
            "{:<12} {:>10} {:>12} {:>13}",
            row.tax_year,
            percent_opt(row.grants_pct),
            percent_opt(row.contractor_pct),
            percent_opt(row.compensation_filing_org_pct),
        );
    }

    println!("\nSchedule I - Grants Awarded, {first}-{last}");
    println!("  Aggregate: {}", dollars_cents(report.grants_aggregate));
    match report.grants_yearly_average {
        Some(avg) => println!("  Yearly average: {}", dollars_cents(avg)),
        None => println!("  Yearly average: n/a (single-year range)"),
    }
    for entry in report.top_grantees() {
        println!("  {:<50} {:>15}", entry.name, dollars(entry.amount));
    }

    println!("\nPart VII-B - Independent Contractors, {first}-{last}");
    for entry in report.top_contractors() {
        println!("  {:<50} {:>15}", entry.name, dollars(entry.amount));
    }

    println!("\nSchedule J - Compensation (most recent tax year)");
    for entry in &report.compensation_latest {
        println!(
            "  {:<30} {:<25} {:>15}",
            entry.name,
            entry.title,
            dollars(entry.total_compensation)
        );
    }

    Ok(())
}

fn run_export(out: &Path, data_dir: &Path, filer: Option<&str>) -> Result<()> {
    let cache = load_cache(data_dir)?;
    let summary = summary_table(cache.dataset());
    let names = filer_names(&summary);
    let selected = select_filer(&names, filer)?;
    let report = FilerReport::build(cache.dataset(), &summary, &selected);

    let file = std::fs::File::create(out)?;
    serde_json::to_writer_pretty(file, &report)?;
    println!("✓ Exported report for {selected} to {}", out.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(data_dir: &Path) -> Result<()> {
    let cache = load_cache(data_dir)?;
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(cache)?;
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_data_dir: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: form990-explorer report <data_dir>");
    std::process::exit(1);
}
