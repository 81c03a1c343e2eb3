//! Per-entity repair rules.
//!
//! Each rule set runs missing-value repair, type coercion, validity
//! filtering and value normalization, in that order. Fill statistics
//! (mean, median) are computed from the non-null values of the sheet before
//! any cell is changed.

use tracing::{debug, warn};

use crate::error::{Result, StorelensError};
use crate::table::stats::{mean, median, round_to};
use crate::table::{Table, Value};

use super::report::SheetReport;
use super::text::title_case;

/// Genders kept as-is; anything else becomes "Unknown".
pub const VALID_GENDERS: &[&str] = &["Male", "Female", "Other", "Unknown"];

/// Lowest and highest age kept (exclusive lower bound).
pub const AGE_BOUNDS: (i64, i64) = (0, 120);

/// Accepted rating range (inclusive).
pub const RATING_BOUNDS: (f64, f64) = (1.0, 5.0);

/// Repair a customers sheet.
pub fn clean_customers(mut table: Table, report: &mut SheetReport) -> Result<Table> {
    let sheet = report.sheet.clone();

    fill_integer(&mut table, report, "customer_id", 0)?;
    fill_constant(&mut table, report, "gender", "Unknown");
    let age = fill_statistic(&mut table, report, "age", Statistic::Median)?;
    table.try_map_column(age, |row, v| to_integer(&sheet, "age", row, v))?;
    fill_constant(&mut table, report, "city", "Unknown");
    let loyalty = fill_statistic(&mut table, report, "loyalty_score", Statistic::Mean)?;
    round_column(&mut table, loyalty, 1);

    let (low, high) = AGE_BOUNDS;
    report.invalid_rows_dropped += table.retain_rows(|row| {
        row[age].as_i64().is_some_and(|a| a > low && a <= high)
    });

    let gender = table.require_column(&sheet, "gender")?;
    table.map_column(gender, |v| {
        let normalized = v.as_text().map(|s| title_case(s.trim()));
        match normalized {
            Some(g) if VALID_GENDERS.contains(&g.as_str()) => Value::Text(g),
            _ => Value::text("Unknown"),
        }
    });

    Ok(table)
}

/// Repair a products sheet.
pub fn clean_products(mut table: Table, report: &mut SheetReport) -> Result<Table> {
    fill_integer(&mut table, report, "product_id", 0)?;
    fill_constant(&mut table, report, "product_name", "Unknown Product");
    fill_constant(&mut table, report, "category", "Uncategorized");
    let price = fill_statistic(&mut table, report, "price", Statistic::Mean)?;
    round_column(&mut table, price, 2);
    ensure_column(&mut table, "stock");
    let stock = fill_integer(&mut table, report, "stock", 0)?;

    report.invalid_rows_dropped += table.retain_rows(|row| {
        row[price].as_f64().is_some_and(|p| p >= 0.0)
            && row[stock].as_i64().is_some_and(|s| s >= 0)
    });

    Ok(table)
}

/// Repair an orders sheet.
pub fn clean_orders(mut table: Table, report: &mut SheetReport) -> Result<Table> {
    let sheet = report.sheet.clone();

    fill_integer(&mut table, report, "order_id", 0)?;
    fill_integer(&mut table, report, "customer_id", 0)?;

    let order_date = table.require_column(&sheet, "order_date")?;
    table.map_column(order_date, |v| {
        v.as_datetime().map(Value::DateTime).unwrap_or(Value::Null)
    });

    fill_constant(&mut table, report, "product_category", "Unknown");
    let order_value = fill_statistic(&mut table, report, "order_value", Statistic::Mean)?;
    round_column(&mut table, order_value, 2);

    let payment = fill_constant(&mut table, report, "payment_method", "Unknown");
    table.map_column(payment, |v| match v.as_text() {
        Some(s) => Value::Text(title_case(s.trim())),
        None => Value::Null,
    });

    let delivered = fill_constant(&mut table, report, "delivered", "No");
    table.map_column(delivered, |v| {
        let flag = v.as_text().map(|s| title_case(s.trim()));
        let mapped = match flag.as_deref() {
            Some("True") | Some("Yes") => "Yes",
            // "False", "No" and anything unrecognised
            _ => "No",
        };
        Value::text(mapped)
    });

    report.invalid_rows_dropped += table.retain_rows(|row| !row[order_date].is_null());

    Ok(table)
}

/// Repair a reviews sheet.
pub fn clean_reviews(mut table: Table, report: &mut SheetReport) -> Result<Table> {
    fill_integer(&mut table, report, "review_id", 0)?;
    fill_integer(&mut table, report, "customer_id", 0)?;
    fill_integer(&mut table, report, "product_id", 0)?;
    let rating = fill_statistic(&mut table, report, "rating", Statistic::Mean)?;
    round_column(&mut table, rating, 1);

    let text = fill_constant(&mut table, report, "review_text", "No review text");
    table.map_column(text, |v| match v.as_text() {
        Some(s) => Value::Text(s.trim().to_string()),
        None => Value::Null,
    });

    let (low, high) = RATING_BOUNDS;
    report.invalid_rows_dropped += table.retain_rows(|row| {
        row[rating].as_f64().is_some_and(|r| r >= low && r <= high)
    });

    Ok(table)
}

#[derive(Debug, Clone, Copy)]
enum Statistic {
    Mean,
    Median,
}

/// Append an all-null column if it is absent. Returns its index.
fn ensure_column(table: &mut Table, column: &str) -> usize {
    match table.column_index(column) {
        Some(idx) => idx,
        None => table.add_column(column, Value::Null),
    }
}

/// Fill nulls in an optional text column with a constant.
fn fill_constant(table: &mut Table, report: &mut SheetReport, column: &str, default: &str) -> usize {
    let col = ensure_column(table, column);
    let filled = table.fill_null(col, &Value::text(default));
    report.add_fill(column, filled, default.to_string());
    col
}

/// Fill nulls in a required identifier/count column and coerce it to integers.
fn fill_integer(
    table: &mut Table,
    report: &mut SheetReport,
    column: &str,
    default: i64,
) -> Result<usize> {
    let sheet = report.sheet.clone();
    let col = table.require_column(&sheet, column)?;
    let filled = table.fill_null(col, &Value::Int(default));
    report.add_fill(column, filled, default.to_string());
    table.try_map_column(col, |row, v| to_integer(&sheet, column, row, v))?;
    Ok(col)
}

/// Coerce a required column to numbers, then fill its nulls with a statistic
/// of the existing values. When there are no values, nulls stay in place.
fn fill_statistic(
    table: &mut Table,
    report: &mut SheetReport,
    column: &str,
    statistic: Statistic,
) -> Result<usize> {
    let sheet = report.sheet.clone();
    let col = table.require_column(&sheet, column)?;
    table.try_map_column(col, |row, v| to_number(&sheet, column, row, v))?;

    let values = table.numeric_values(col);
    let fill = match statistic {
        Statistic::Mean => mean(&values),
        Statistic::Median => median(&values),
    };

    match fill {
        Some(fill) => {
            let filled = table.fill_null(col, &Value::Float(fill));
            debug!(sheet = %sheet, column, ?statistic, fill, filled, "Filled missing values");
            report.add_fill(column, filled, fill.to_string());
        }
        None if !table.is_empty() => {
            warn!(sheet = %sheet, column, ?statistic, "No values to impute from, missing cells left empty");
        }
        None => {}
    }
    Ok(col)
}

/// Round every number in a column.
fn round_column(table: &mut Table, col: usize, digits: u32) {
    table.map_column(col, |v| match v.as_f64() {
        Some(x) => Value::Float(round_to(x, digits)),
        None => v.clone(),
    });
}

fn to_integer(sheet: &str, column: &str, row: usize, value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Int(_) | Value::Float(_) | Value::Text(_) => value
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| coercion_error(sheet, column, row, value, "integer")),
        _ => Err(coercion_error(sheet, column, row, value, "integer")),
    }
}

fn to_number(sheet: &str, column: &str, row: usize, value: &Value) -> Result<Value> {
    match value {
        Value::Null | Value::Int(_) | Value::Float(_) => Ok(value.clone()),
        Value::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| coercion_error(sheet, column, row, value, "number")),
        _ => Err(coercion_error(sheet, column, row, value, "number")),
    }
}

fn coercion_error(sheet: &str, column: &str, row: usize, value: &Value, target: &'static str) -> StorelensError {
    StorelensError::Coercion {
        sheet: sheet.to_string(),
        column: column.to_string(),
        row,
        value: value.to_string(),
        target,
    }
}
