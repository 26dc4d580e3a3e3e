use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Arg, ArgMatches, Command};
use orders::{
    Batch,
    config::Config,
    lines,
    parser::Dialect,
    reconcile::Reference,
    report::{AnomalyReport, Details, FullReport, Statistics},
};
use tracing_subscriber::EnvFilter;

fn reference_arg(required: bool) -> Arg<'static> {
    Arg::new("reference")
        .short('r')
        .long("reference")
        .help("Reference counts to compare against, e.g. '87支鬼王、三鬼頭x101'")
        .value_name("FILE")
        .takes_value(true)
        .required(required)
}

fn cli() -> Command<'static> {
    Command::new("Orders")
        .version("0.1.0")
        .author("Luke Nimtz <luke.nimtz@gmail.com>")
        .about("Expands, totals and checks pasted shop orders")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Order text file or '-' for stdin")
                .value_name("FILE")
                .default_value("-")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("YAML file with prices and wish markers")
                .value_name("FILE")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("multiline")
                .short('m')
                .long("multiline")
                .help("Input has one order over several lines instead of tab-delimited rows")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Rewrites multi-line orders as tab-delimited rows"),
        )
        .subcommand(Command::new("details").about("Shows one line per ordered unit"))
        .subcommand(Command::new("stats").about("Shows quantity and amount per item"))
        .subcommand(Command::new("anomalies").about("Shows orders that repeat an item"))
        .subcommand(
            Command::new("compare")
                .about("Compares item quantities with reference counts")
                .arg(reference_arg(true)),
        )
        .subcommand(
            Command::new("report")
                .about("Shows summary, details, statistics and anomalies")
                .arg(reference_arg(false)),
        )
}

async fn reference(matches: &ArgMatches) -> Result<Option<Reference>> {
    match matches.value_of("reference") {
        Some(file) => {
            let text = lines::read_text(Some(file.to_owned()))
                .await
                .with_context(|| format!("Failed to read reference file: {file}"))?;
            Ok(Some(text.parse()?))
        }
        None => Ok(None),
    }
}

#[async_std::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let config = match matches.value_of("config") {
        Some(file) => Config::from_file(file).await?,
        None => Config::default(),
    };
    let dialect = if matches.is_present("multiline") || matches.subcommand_name() == Some("convert")
    {
        Dialect::Multiline
    } else {
        Dialect::Tabbed
    };
    let input = matches
        .value_of("input")
        .filter(|path| *path != "-")
        .map(String::from);
    let text = lines::read_text(input.clone())
        .await
        .with_context(|| format!("Failed to read orders from {}", input.as_deref().unwrap_or("stdin")))?;

    let batch = Batch::parse(&text, dialect, &config);
    if batch.is_empty() {
        bail!("No orders could be parsed from the input, check its format");
    }
    let json = matches.is_present("json");

    match matches.subcommand() {
        Some(("convert", _)) => println!("{}", batch.to_tabbed()),
        Some(("details", _)) if json => {
            println!("{}", serde_json::to_string_pretty(&batch.expansion.units)?)
        }
        Some(("details", _)) => print!("{}", Details(&batch.expansion.units)),
        Some(("stats", _)) if json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "item_quantity": batch.expansion.item_quantity,
                "item_amount": batch.expansion.item_amount,
            }))?
        ),
        Some(("stats", _)) => print!("{}", Statistics::new(&batch.expansion, &config.prices)),
        Some(("anomalies", _)) if json => {
            println!("{}", serde_json::to_string_pretty(&batch.expansion.anomalies)?)
        }
        Some(("anomalies", _)) => print!("{}", AnomalyReport(&batch.expansion.anomalies)),
        Some(("compare", compare)) => {
            let reference = reference(compare)
                .await?
                .context("Reference file is required")?;
            let reconciliation = batch.reconcile(&reference);
            if json {
                println!("{}", serde_json::to_string_pretty(&reconciliation)?);
            } else {
                print!("{reconciliation}");
            }
        }
        Some(("report", report)) => {
            let reconciliation = reference(report)
                .await?
                .map(|reference| batch.reconcile(&reference));
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "batch": batch,
                        "reconciliation": reconciliation,
                    }))?
                );
            } else {
                print!(
                    "{}",
                    FullReport {
                        batch: &batch,
                        prices: &config.prices,
                        reconciliation: reconciliation.as_ref(),
                        generated_at: Local::now(),
                    }
                );
            }
        }
        _ if json => println!("{}", serde_json::to_string_pretty(&batch)?),
        _ => eprintln!(
            "Loaded {} orders, {} units. Run with --help to see reports.",
            batch.orders.len(),
            batch.expansion.units.len()
        ),
    };
    Ok(())
}
