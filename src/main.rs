use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use crashdb::core::config::Config;
use crashdb::core::indexing::{OpenAddressTable, RedBlackIndex};
use crashdb::core::ingest;
use crashdb::core::types::{AccidentRecord, RecordFilter};

#[derive(Parser, Debug)]
#[clap(author, version, about = "In-memory indexes over a traffic-accident dataset", long_about = None)]
struct Cli {
    /// Path to the accident CSV dataset (overrides the config file).
    data: Option<PathBuf>,

    /// Path to a TOML config file.
    #[clap(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let start = Instant::now();
    let outcome = ingest::load_records(&config.data_path)
        .with_context(|| format!("loading dataset from '{}'", config.data_path.display()))?;
    println!(
        "Loaded {} records in {:.2?} ({} malformed rows skipped)",
        outcome.records.len(),
        start.elapsed(),
        outcome.skipped
    );

    let start = Instant::now();
    let mut table = OpenAddressTable::with_buckets(config.initial_buckets);
    for record in &outcome.records {
        table.insert(record.clone())?;
    }
    println!(
        "Hash table built in {:.2?} ({} buckets, load factor {:.2})",
        start.elapsed(),
        table.bucket_count(),
        table.load_factor()
    );

    let start = Instant::now();
    let mut tree = RedBlackIndex::new();
    for record in outcome.records {
        tree.insert(record);
    }
    println!("Red-black tree built in {:.2?}", start.elapsed());

    println!("\nWelcome to the US Traffic Accidents Database");
    println!("Which data structure do you want to use?");
    println!("1. Red Black Tree");
    println!("2. Hash Table");
    match prompt("Enter your choice: ")?.as_str() {
        "1" => tree_menu(&mut tree)?,
        "2" => table_menu(&mut table)?,
        _ => println!("Invalid choice, exiting."),
    }

    Ok(())
}

/// Prints a label and reads one trimmed line from stdin.
fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        anyhow::bail!("end of input");
    }
    Ok(line.trim().to_string())
}

/// Prompts for all six record fields. Returns `None` (after printing a
/// message) when a numeric field does not parse.
fn prompt_record() -> anyhow::Result<Option<AccidentRecord>> {
    let id = prompt("Enter ID: ")?;
    let severity = match prompt("Enter Severity: ")?.parse::<i32>() {
        Ok(s) => s,
        Err(_) => {
            println!("Invalid severity, must be an integer.");
            return Ok(None);
        }
    };
    let distance = match prompt("Enter Distance: ")?.parse::<f64>() {
        Ok(d) => d,
        Err(_) => {
            println!("Invalid distance, must be a number.");
            return Ok(None);
        }
    };
    let city = prompt("Enter City: ")?;
    let state = prompt("Enter State: ")?;
    let zipcode = prompt("Enter Zipcode: ")?;
    Ok(Some(AccidentRecord::new(id, severity, distance, city, state, zipcode)))
}

/// Search submenu shared by both structures: by exact id or by one of the
/// filterable attributes. Returns the chosen lookup.
enum SearchChoice {
    ById(String),
    ByFilter(RecordFilter),
    Invalid,
}

fn prompt_search() -> anyhow::Result<SearchChoice> {
    println!("Do you want to search by:");
    println!("1. ID");
    println!("2. Severity");
    println!("3. City");
    println!("4. State");
    println!("5. Zipcode");
    let choice = prompt("Enter your choice: ")?;

    // Empty input (or 0 for severity) means "no constraint", which turns
    // the predicate search into "return everything".
    Ok(match choice.as_str() {
        "1" => SearchChoice::ById(prompt("Enter ID: ")?),
        "2" => {
            let input = prompt("Enter Severity (0 for any): ")?;
            match input.parse::<i32>() {
                Ok(0) => SearchChoice::ByFilter(RecordFilter::default()),
                Ok(s) => SearchChoice::ByFilter(RecordFilter::by_severity(s)),
                Err(_) => {
                    println!("Invalid severity, must be an integer.");
                    SearchChoice::Invalid
                }
            }
        }
        "3" => {
            let city = prompt("Enter City (empty for any): ")?;
            SearchChoice::ByFilter(if city.is_empty() {
                RecordFilter::default()
            } else {
                RecordFilter::by_city(city)
            })
        }
        "4" => {
            let state = prompt("Enter State (empty for any): ")?;
            SearchChoice::ByFilter(if state.is_empty() {
                RecordFilter::default()
            } else {
                RecordFilter::by_state(state)
            })
        }
        "5" => {
            let zipcode = prompt("Enter Zipcode (empty for any): ")?;
            SearchChoice::ByFilter(if zipcode.is_empty() {
                RecordFilter::default()
            } else {
                RecordFilter::by_zipcode(zipcode)
            })
        }
        _ => {
            println!("Invalid search type, please try again.");
            SearchChoice::Invalid
        }
    })
}

fn tree_menu(tree: &mut RedBlackIndex) -> anyhow::Result<()> {
    loop {
        println!("\nRed Black Tree Menu:");
        println!("1. Insert");
        println!("2. Search");
        println!("3. Remove by ID");
        println!("4. Display all");
        println!("5. Exit");

        match prompt("Enter your choice: ")?.as_str() {
            "1" => {
                if let Some(record) = prompt_record()? {
                    tree.insert(record);
                    println!("Inserted. Tree now holds {} records.", tree.len());
                }
            }
            "2" => match prompt_search()? {
                SearchChoice::ById(id) => match tree.get(&id) {
                    Some(record) => println!("{record}"),
                    None => println!("ID {id} not found in the tree."),
                },
                SearchChoice::ByFilter(filter) => {
                    let matches = tree.filter(&filter);
                    for record in &matches {
                        println!("{record}");
                    }
                    println!("{} match(es).", matches.len());
                }
                SearchChoice::Invalid => {}
            },
            "3" => {
                let id = prompt("Enter ID: ")?;
                match tree.remove(&id) {
                    Some(record) => println!("Removed: {record}"),
                    None => println!("ID {id} not found, nothing removed."),
                }
            }
            "4" => {
                for record in tree.iter() {
                    println!("{record}");
                }
                println!("{} record(s).", tree.len());
            }
            "5" => {
                println!("Exiting Red Black Tree Menu.");
                return Ok(());
            }
            _ => println!("Invalid choice, please try again."),
        }
    }
}

fn table_menu(table: &mut OpenAddressTable) -> anyhow::Result<()> {
    loop {
        println!("\nHash Table Menu:");
        println!("1. Insert");
        println!("2. Search");
        println!("3. Remove by ID");
        println!("4. Display all");
        println!("5. Stats");
        println!("6. Exit");

        match prompt("Enter your choice: ")?.as_str() {
            "1" => {
                if let Some(record) = prompt_record()? {
                    match table.insert(record) {
                        Ok(()) => println!("Inserted. Table now holds {} records.", table.len()),
                        Err(e) => println!("Insert failed: {e}"),
                    }
                }
            }
            "2" => match prompt_search()? {
                SearchChoice::ById(id) => match table.get(&id) {
                    Some(record) => println!("{record}"),
                    None => println!("ID {id} not found in the hash table."),
                },
                SearchChoice::ByFilter(filter) => {
                    let results = table.filter(&filter)?;
                    for record in results.iter() {
                        println!("{record}");
                    }
                    println!("{} match(es).", results.len());
                }
                SearchChoice::Invalid => {}
            },
            "3" => {
                let id = prompt("Enter ID: ")?;
                match table.remove(&id) {
                    Some(record) => println!("Removed: {record}"),
                    None => println!("ID {id} not found, nothing removed."),
                }
            }
            "4" => {
                for record in table.iter() {
                    println!("{record}");
                }
                println!("{} record(s).", table.len());
            }
            "5" => {
                println!(
                    "{} records, {} buckets, load factor {:.3}",
                    table.len(),
                    table.bucket_count(),
                    table.load_factor()
                );
            }
            "6" => {
                println!("Exiting Hash Table Menu.");
                return Ok(());
            }
            _ => println!("Invalid choice, please try again."),
        }
    }
}
