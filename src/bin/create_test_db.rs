use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use expenses_rs::{
    CategoryName, CreateTransactionRequest, NewCategory, NewUser, PasswordHash, TransactionType,
    ValidatedPassword, create_category, create_transactions, create_user, initialize_db,
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demopassword";

/// A utility for creating a test database for the REST API server of expenses_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {DEMO_EMAIL} with the password {DEMO_PASSWORD:?}...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new(DEMO_PASSWORD)?,
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        NewUser {
            email: DEMO_EMAIL.to_owned(),
            first_name: "Demo".to_owned(),
            last_name: "User".to_owned(),
            password_hash,
        },
        &conn,
    )?;

    println!("Creating categories...");

    let mut category_ids = Vec::new();
    for (category_type, name) in [
        (TransactionType::Income, "Salary"),
        (TransactionType::Expense, "Groceries"),
        (TransactionType::Expense, "Rent"),
        (TransactionType::Saving, "Emergency fund"),
        (TransactionType::Installments, "Laptop"),
    ] {
        let category = create_category(
            NewCategory {
                category_type,
                name: CategoryName::new(name)?,
                note: String::new(),
            },
            user.id,
            &conn,
        )?;
        category_ids.push((category_type, category.id.to_string()));
    }

    println!("Creating transactions...");

    let mut requests = Vec::new();
    for year in [2024, 2025] {
        for month in ["JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE"] {
            for (category_type, category_id) in &category_ids {
                let (amount, currency, exchange_rate) = match category_type {
                    TransactionType::Income => (2500.0, "USD", Some(40.0)),
                    TransactionType::Expense => (8000.0, "UYU", None),
                    TransactionType::Saving => (300.0, "EUR", Some(44.0)),
                    TransactionType::Installments => (3500.0, "UYU", None),
                };

                requests.push(CreateTransactionRequest {
                    transaction_type: Some(category_type.to_string()),
                    amount: Some(amount),
                    currency: Some(currency.to_owned()),
                    note: Some(format!("{month} {year}")),
                    day: Some(1),
                    month: Some(month.to_owned()),
                    year: Some(year),
                    exchange_rate,
                    category_id: Some(category_id.clone()),
                    category: None,
                });
            }
        }
    }

    let transactions = create_transactions(&requests, user.id, &conn)?;

    println!("Created {} transactions.", transactions.len());
    println!("Success!");

    Ok(())
}
