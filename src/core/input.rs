use crate::domain::model::{LineItem, LineItemList, RawLineItem, RowRejection};
use crate::domain::program::Program;
use crate::utils::error::{Result, SpecError};
use crate::utils::format::{parse_date, parse_money_lenient};
use rust_decimal::Decimal;

/// Largest annual price accepted for one license.
pub const MAX_ANNUAL_PRICE: i64 = 1_000_000_000_000;
/// Largest license count accepted on one row.
pub const MAX_LICENSE_COUNT: u32 = 1_000_000;

/// Reads raw rows from CSV with the header
/// `program,start_date,end_date,license_count,annual_price`.
pub fn parse_csv(data: &[u8]) -> Result<LineItemList> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut list = LineItemList::new();
    for record in reader.deserialize::<RawLineItem>() {
        list.push(record?);
    }

    tracing::debug!("Read {} rows from CSV", list.len());
    Ok(list)
}

/// Turns one form row into a [`LineItem`], or says why it cannot be priced.
pub fn validate_row(row: &RawLineItem) -> Result<LineItem> {
    let program: Program = row.program.parse()?;
    let start_date = parse_date(&row.start_date)?;
    let end_date = parse_date(&row.end_date)?;

    if start_date > end_date {
        return Err(SpecError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }

    let license_count = parse_count(&row.license_count)?;

    let annual_price = parse_money_lenient(&row.annual_price);
    if annual_price <= Decimal::ZERO {
        return Err(SpecError::NonPositivePrice {
            value: annual_price,
        });
    }
    if annual_price > Decimal::from(MAX_ANNUAL_PRICE) {
        return Err(SpecError::PriceOutOfRange {
            value: annual_price,
            max: MAX_ANNUAL_PRICE,
        });
    }

    Ok(LineItem {
        program,
        start_date,
        end_date,
        license_count,
        annual_price,
    })
}

fn parse_count(text: &str) -> Result<u32> {
    let value: i64 = text.trim().parse().map_err(|_| SpecError::InvalidCount {
        value: text.to_string(),
    })?;

    if value < 1 {
        return Err(SpecError::NonPositiveCount { value });
    }

    u32::try_from(value)
        .ok()
        .filter(|count| *count <= MAX_LICENSE_COUNT)
        .ok_or(SpecError::CountOutOfRange {
            value,
            max: MAX_LICENSE_COUNT,
        })
}

/// Splits rows into priceable items (input order kept) and rejections.
pub fn filter_valid(rows: &LineItemList) -> (Vec<LineItem>, Vec<RowRejection>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match validate_row(row) {
            Ok(item) => valid.push(item),
            Err(error) => {
                tracing::warn!("Skipping row {}: {}", idx + 1, error);
                rejected.push(RowRejection {
                    row_number: idx + 1,
                    error,
                });
            }
        }
    }

    (valid, rejected)
}
