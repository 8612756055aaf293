use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use super::model::{month_name, CustomerType, Dataset, Gender, Payment, Record};

/// Columns the source CSV must carry, with the exact header spelling of the
/// supermarket-sales export.
const REQUIRED_COLUMNS: [&str; 15] = [
    "Branch",
    "City",
    "Customer type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross income",
    "Rating",
];

/// Date format of the source CSV (`1/5/2019`).
const DATE_FORMAT: &str = "%m/%d/%Y";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed ingest. The load is all-or-nothing: any bad row fails the whole
/// file, there is no partial dataset.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}, column '{column}': {message}")]
    BadValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the sales dataset from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<Dataset, IngestionError> {
    let reader = csv::Reader::from_path(path)?;
    load_from(reader)
}

/// Load the sales dataset from any reader (used by tests and stdin pipes).
pub fn load_reader<R: Read>(source: R) -> Result<Dataset, IngestionError> {
    load_from(csv::Reader::from_reader(source))
}

fn load_from<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset, IngestionError> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    // Resolve every required column to its position up front so a missing
    // column fails before any row is parsed.
    let mut positions = [0usize; REQUIRED_COLUMNS.len()];
    for (i, name) in REQUIRED_COLUMNS.iter().enumerate() {
        positions[i] = headers
            .iter()
            .position(|h| h == name)
            .ok_or(IngestionError::MissingColumn(name))?;
    }
    let col = |record: &csv::StringRecord, i: usize| -> String {
        record.get(positions[i]).unwrap_or("").to_string()
    };

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        let date = parse_date(&col(&record, 9), row_no)?;
        records.push(Record {
            date,
            month: month_name(date),
            time: parse_time(&col(&record, 10)),
            branch: col(&record, 0),
            city: col(&record, 1),
            customer_type: parse_customer_type(&col(&record, 2), row_no)?,
            gender: parse_gender(&col(&record, 3), row_no)?,
            product_line: col(&record, 4),
            unit_price: parse_f64(&col(&record, 5), row_no, "Unit price")?,
            quantity: parse_u32(&col(&record, 6), row_no, "Quantity")?,
            tax: parse_f64(&col(&record, 7), row_no, "Tax 5%")?,
            total: parse_f64(&col(&record, 8), row_no, "Total")?,
            payment: parse_payment(&col(&record, 11), row_no)?,
            cogs: parse_f64(&col(&record, 12), row_no, "cogs")?,
            gross_income: parse_f64(&col(&record, 13), row_no, "gross income")?,
            rating: parse_f64(&col(&record, 14), row_no, "Rating")?,
        });
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

fn parse_date(s: &str, row: usize) -> Result<NaiveDate, IngestionError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| IngestionError::BadValue {
        row,
        column: "Date",
        message: format!("'{s}' is not a {DATE_FORMAT} date ({e})"),
    })
}

/// Time of day is informational only, so a blank or malformed value is kept
/// as `None` rather than failing the load.
fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_f64(s: &str, row: usize, column: &'static str) -> Result<f64, IngestionError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| IngestionError::BadValue {
            row,
            column,
            message: format!("'{s}' is not a number"),
        })
}

fn parse_u32(s: &str, row: usize, column: &'static str) -> Result<u32, IngestionError> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| IngestionError::BadValue {
            row,
            column,
            message: format!("'{s}' is not a positive integer"),
        })
}

fn parse_customer_type(s: &str, row: usize) -> Result<CustomerType, IngestionError> {
    match s.trim() {
        "Member" => Ok(CustomerType::Member),
        "Normal" => Ok(CustomerType::Normal),
        other => Err(IngestionError::BadValue {
            row,
            column: "Customer type",
            message: format!("'{other}' is not Member or Normal"),
        }),
    }
}

fn parse_gender(s: &str, row: usize) -> Result<Gender, IngestionError> {
    match s.trim() {
        "Male" => Ok(Gender::Male),
        "Female" => Ok(Gender::Female),
        other => Err(IngestionError::BadValue {
            row,
            column: "Gender",
            message: format!("'{other}' is not Male or Female"),
        }),
    }
}

fn parse_payment(s: &str, row: usize) -> Result<Payment, IngestionError> {
    match s.trim() {
        "Cash" => Ok(Payment::Cash),
        "Credit card" => Ok(Payment::CreditCard),
        "Ewallet" => Ok(Payment::Ewallet),
        other => Err(IngestionError::BadValue {
            row,
            column: "Payment",
            message: format!("'{other}' is not Cash, Credit card or Ewallet"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CategoryColumn;

    const HEADER: &str = "Invoice ID,Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total,Date,Time,Payment,cogs,gross income,Rating";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for row in rows {
            s.push('\n');
            s.push_str(row);
        }
        s
    }

    #[test]
    fn loads_a_well_formed_file() {
        let csv = csv_with_rows(&[
            "750-67-8428,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,1/5/2019,13:08,Ewallet,522.83,26.1415,9.1",
            "226-31-3081,C,Naypyitaw,Normal,Female,Electronic accessories,15.28,5,3.82,80.22,3/8/2019,10:29,Cash,76.4,3.82,9.6",
        ]);
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records()[0];
        assert_eq!(first.branch, "A");
        assert_eq!(first.month, "January");
        assert_eq!(first.quantity, 7);
        assert_eq!(first.payment, Payment::Ewallet);
        assert_eq!(
            first.time,
            Some(NaiveTime::from_hms_opt(13, 8, 0).unwrap())
        );

        let payments: Vec<&String> = ds.domain(CategoryColumn::Payment).iter().collect();
        assert_eq!(payments, ["Cash", "Ewallet"]);
    }

    #[test]
    fn extra_columns_are_ignored_but_missing_ones_are_fatal() {
        let csv = "Branch,City\nA,Yangon";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestionError::MissingColumn("Customer type")
        ));
    }

    #[test]
    fn one_bad_date_fails_the_whole_load() {
        let csv = csv_with_rows(&[
            "x,A,Yangon,Member,Female,Health and beauty,10,1,0.5,10.5,1/5/2019,13:08,Cash,10,0.5,7",
            "x,A,Yangon,Member,Female,Health and beauty,10,1,0.5,10.5,2019-01-06,13:08,Cash,10,0.5,7",
        ]);
        let err = load_reader(csv.as_bytes()).unwrap_err();
        match err {
            IngestionError::BadValue { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        let csv = csv_with_rows(&[
            "x,A,Yangon,Member,Female,Health and beauty,10,1,0.5,10.5,1/5/2019,13:08,Bitcoin,10,0.5,7",
        ]);
        assert!(load_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn blank_time_is_kept_as_none() {
        let csv = csv_with_rows(&[
            "x,A,Yangon,Member,Female,Health and beauty,10,1,0.5,10.5,1/5/2019,,Cash,10,0.5,7",
        ]);
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].time, None);
    }
}
