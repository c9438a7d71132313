use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use ledgerline::{
    CategoryType, NewTransaction, create_transaction, get_all_categories, initialize_db,
};

/// A utility for creating a test database for the Ledgerline server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to create, counting back from today.
    #[arg(long, short, default_value_t = 90)]
    days: u16,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let categories = get_all_categories(&conn)?;
    let income_category = categories
        .iter()
        .find(|category| category.category_type == CategoryType::Income)
        .ok_or("no income category found")?;
    let expense_categories: Vec<_> = categories
        .iter()
        .filter(|category| category.category_type == CategoryType::Expense)
        .collect();

    if expense_categories.is_empty() {
        return Err("no expense categories found".into());
    }

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for days_ago in 0..i64::from(args.days) {
        let date = today - Duration::days(days_ago);

        // Pay day on the first of every month.
        if date.day() == 1 {
            create_transaction(
                NewTransaction {
                    amount: 4_250.0,
                    description: "Salary".to_owned(),
                    category_id: income_category.id,
                    transaction_date: date,
                },
                &conn,
            )?;
            count += 1;
        }

        // One expense every other day, cycling through the expense categories.
        if days_ago % 2 == 0 {
            let index = (days_ago / 2) as usize % expense_categories.len();
            let category = expense_categories[index];

            create_transaction(
                NewTransaction {
                    amount: sample_amount(date),
                    description: format!("{} purchase", category.name),
                    category_id: category.id,
                    transaction_date: date,
                },
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// A repeatable amount between 5.00 and 154.99 that varies by date.
fn sample_amount(date: Date) -> f64 {
    let cents = (u64::from(date.to_julian_day().unsigned_abs()) * 7_919) % 15_000 + 500;

    cents as f64 / 100.0
}
