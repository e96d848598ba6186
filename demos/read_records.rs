//! Example: Read a Google Sheets range as header-keyed records
//!
//! The first row of the range becomes the field names. If `DATE_COLUMN`
//! names a column holding serial dates, it is decoded as well.
//!
//! Prerequisites:
//! 1. A service account key with read access to the spreadsheet
//! 2. The spreadsheet shared with the service account's email
//!
//! Run with:
//! ```bash
//! export GOOGLE_APPLICATION_CREDENTIALS="/path/to/service-account.json"
//! # or: export GOOGLE_APPLICATION_CREDENTIALS_BASE64_JSON="$(base64 -w0 key.json)"
//!
//! export SHEET_ID="1f5epAPxP_Yd3g1TunEMdtianpVAhKS0RG6BKRDSLtrk"
//! export SHEET_RANGE="Orders!A1:F500"   # Optional, defaults to Sheet1
//! export DATE_COLUMN="ordered_at"       # Optional
//!
//! cargo run --example read_records
//! ```

use chrono::Utc;
use gsheets::records::shape_records;
use gsheets::serial_date::SerialDate;
use gsheets::sheets::SheetService;
use gsheets::source::ValueSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📖 gsheets Record Reader Example\n");
    println!("================================\n");

    let sheet_id = std::env::var("SHEET_ID")?;
    let range = std::env::var("SHEET_RANGE").unwrap_or_else(|_| "Sheet1".to_string());
    let date_column = std::env::var("DATE_COLUMN").ok();

    println!("📍 Spreadsheet: {}", sheet_id);
    println!("📐 Range: {}\n", range);

    let service = SheetService::from_env(sheet_id)?;

    println!("⏳ Fetching values...");
    let grid = service.get(&range).await?;
    let records = shape_records(&grid)?;
    println!("✅ {} records\n", records.len());

    for (i, record) in records.iter().take(10).enumerate() {
        println!("Record {}:", i + 1);
        for (field, value) in record {
            println!("  {:<20} {}", field, value);
        }

        if let Some(cell) = date_column.as_deref().and_then(|column| record.get(column)) {
            match SerialDate::try_from(cell).and_then(|serial| serial.to_datetime(&Utc)) {
                Ok(at) => println!("  📅 {}", at.format("%Y-%m-%d %H:%M:%S")),
                Err(e) => println!("  ⚠️  {}", e),
            }
        }
        println!();
    }

    if records.len() > 10 {
        println!("... and {} more", records.len() - 10);
    }

    Ok(())
}
