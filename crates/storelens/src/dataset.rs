//! Typed entity records bound from cleaned sheets.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cleaning::SheetKind;
use crate::error::{Result, StorelensError};
use crate::input::Workbook;
use crate::table::{Table, Value};

/// A customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub gender: String,
    pub age: i64,
    pub city: String,
    pub loyalty_score: f64,
}

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDateTime,
    pub product_category: String,
    pub order_value: f64,
    pub payment_method: String,
    pub delivered: String,
}

/// A product review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub rating: f64,
    pub review_text: String,
}

/// The cleaned dataset every metric reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
}

impl Dataset {
    /// Bind the four entity sheets of a cleaned workbook.
    ///
    /// Fails on a missing sheet or column, or on a cell that does not hold
    /// the entity's type (for instance a null `order_date`).
    pub fn from_workbook(workbook: &Workbook) -> Result<Self> {
        Ok(Self {
            customers: SheetView::new(workbook, SheetKind::Customers)?.customers()?,
            products: SheetView::new(workbook, SheetKind::Products)?.products()?,
            orders: SheetView::new(workbook, SheetKind::Orders)?.orders()?,
            reviews: SheetView::new(workbook, SheetKind::Reviews)?.reviews()?,
        })
    }

    /// Latest order date across all orders.
    pub fn latest_order_date(&self) -> Option<NaiveDateTime> {
        self.orders.iter().map(|o| o.order_date).max()
    }
}

/// Typed column access over one sheet.
struct SheetView<'a> {
    name: &'static str,
    table: &'a Table,
}

impl<'a> SheetView<'a> {
    fn new(workbook: &'a Workbook, kind: SheetKind) -> Result<Self> {
        let name = kind.sheet_name();
        Ok(Self {
            name,
            table: workbook.require_sheet(name)?,
        })
    }

    fn column(&self, column: &str) -> Result<usize> {
        self.table.require_column(self.name, column)
    }

    fn error(&self, column: &str, row: usize, value: &Value, target: &'static str) -> StorelensError {
        StorelensError::Coercion {
            sheet: self.name.to_string(),
            column: column.to_string(),
            row,
            value: value.to_string(),
            target,
        }
    }

    fn int(&self, row: &[Value], idx: usize, column: &str, row_idx: usize) -> Result<i64> {
        let value = &row[idx];
        let parsed = match value {
            Value::Int(_) | Value::Float(_) | Value::Text(_) => value.as_i64(),
            _ => None,
        };
        parsed.ok_or_else(|| self.error(column, row_idx, value, "integer"))
    }

    /// Numeric cell. Every float column is filled with a mean during
    /// cleaning, so a null here means that mean had no input.
    fn float(&self, row: &[Value], idx: usize, column: &str, row_idx: usize) -> Result<f64> {
        let value = &row[idx];
        if value.is_null() {
            return Err(StorelensError::Unimputed {
                sheet: self.name.to_string(),
                column: column.to_string(),
                row: row_idx,
            });
        }
        value
            .as_f64()
            .or_else(|| match value {
                Value::Text(s) => s.trim().parse().ok(),
                _ => None,
            })
            .ok_or_else(|| self.error(column, row_idx, value, "number"))
    }

    fn text(&self, row: &[Value], idx: usize) -> String {
        row[idx].as_text().unwrap_or_default()
    }

    fn datetime(&self, row: &[Value], idx: usize, column: &str, row_idx: usize) -> Result<NaiveDateTime> {
        let value = &row[idx];
        value
            .as_datetime()
            .ok_or_else(|| self.error(column, row_idx, value, "date"))
    }

    fn customers(&self) -> Result<Vec<Customer>> {
        let id = self.column("customer_id")?;
        let gender = self.column("gender")?;
        let age = self.column("age")?;
        let city = self.column("city")?;
        let loyalty = self.column("loyalty_score")?;

        self.table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Customer {
                    customer_id: self.int(row, id, "customer_id", i)?,
                    gender: self.text(row, gender),
                    age: self.int(row, age, "age", i)?,
                    city: self.text(row, city),
                    loyalty_score: self.float(row, loyalty, "loyalty_score", i)?,
                })
            })
            .collect()
    }

    fn products(&self) -> Result<Vec<Product>> {
        let id = self.column("product_id")?;
        let name = self.column("product_name")?;
        let category = self.column("category")?;
        let price = self.column("price")?;
        let stock = self.column("stock")?;

        self.table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Product {
                    product_id: self.int(row, id, "product_id", i)?,
                    product_name: self.text(row, name),
                    category: self.text(row, category),
                    price: self.float(row, price, "price", i)?,
                    stock: self.int(row, stock, "stock", i)?,
                })
            })
            .collect()
    }

    fn orders(&self) -> Result<Vec<Order>> {
        let id = self.column("order_id")?;
        let customer = self.column("customer_id")?;
        let date = self.column("order_date")?;
        let category = self.column("product_category")?;
        let value = self.column("order_value")?;
        let payment = self.column("payment_method")?;
        let delivered = self.column("delivered")?;

        self.table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Order {
                    order_id: self.int(row, id, "order_id", i)?,
                    customer_id: self.int(row, customer, "customer_id", i)?,
                    order_date: self.datetime(row, date, "order_date", i)?,
                    product_category: self.text(row, category),
                    order_value: self.float(row, value, "order_value", i)?,
                    payment_method: self.text(row, payment),
                    delivered: self.text(row, delivered),
                })
            })
            .collect()
    }

    fn reviews(&self) -> Result<Vec<Review>> {
        let id = self.column("review_id")?;
        let customer = self.column("customer_id")?;
        let product = self.column("product_id")?;
        let rating = self.column("rating")?;
        let text = self.column("review_text")?;

        self.table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Review {
                    review_id: self.int(row, id, "review_id", i)?,
                    customer_id: self.int(row, customer, "customer_id", i)?,
                    product_id: self.int(row, product, "product_id", i)?,
                    rating: self.float(row, rating, "rating", i)?,
                    review_text: self.text(row, text),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        wb.insert(
            "customers",
            Table::from_raw(
                &["customer_id", "gender", "age", "city", "loyalty_score"],
                &[vec!["1", "Male", "30", "Paris", "3.5"]],
            ),
        );
        wb.insert(
            "products",
            Table::from_raw(
                &["product_id", "product_name", "category", "price", "stock"],
                &[vec!["7", "Lamp", "Home", "19.99", "3"]],
            ),
        );
        wb.insert(
            "orders",
            Table::from_raw(
                &[
                    "order_id",
                    "customer_id",
                    "order_date",
                    "product_category",
                    "order_value",
                    "payment_method",
                    "delivered",
                ],
                &[vec!["100", "1", "2024-02-01", "Home", "19.99", "Card", "Yes"]],
            ),
        );
        wb.insert(
            "reviews",
            Table::from_raw(
                &["review_id", "customer_id", "product_id", "rating", "review_text"],
                &[vec!["5", "1", "7", "4.5", "Nice"]],
            ),
        );
        wb
    }

    #[test]
    fn test_bind_all_entities() {
        let dataset = Dataset::from_workbook(&workbook()).unwrap();
        assert_eq!(dataset.customers[0].city, "Paris");
        assert_eq!(dataset.products[0].stock, 3);
        assert_eq!(dataset.orders[0].order_value, 19.99);
        assert_eq!(dataset.orders[0].order_date.to_string(), "2024-02-01 00:00:00");
        assert_eq!(dataset.reviews[0].rating, 4.5);
        assert!(dataset.latest_order_date().is_some());
    }

    #[test]
    fn test_missing_sheet_is_fatal() {
        let mut wb = Workbook::new();
        wb.insert("customers", workbook().sheet("customers").unwrap().clone());
        let err = Dataset::from_workbook(&wb).unwrap_err();
        assert!(matches!(err, StorelensError::MissingSheet(ref s) if s == "products"));
    }

    #[test]
    fn test_unfilled_order_value_names_the_cause() {
        let mut wb = workbook();
        let mut orders = wb.sheet("orders").unwrap().clone();
        let col = orders.column_index("order_value").unwrap();
        orders.set(0, col, Value::Null);
        wb.insert("orders", orders);

        let err = Dataset::from_workbook(&wb).unwrap_err();
        assert!(matches!(err, StorelensError::Unimputed { ref column, .. } if column == "order_value"));
        assert!(err.to_string().contains("no values to impute from"));
    }

    #[test]
    fn test_binds_text_cells() {
        let mut wb = workbook();
        wb.insert(
            "customers",
            Table::new(
                vec!["customer_id".into(), "gender".into(), "age".into(), "city".into(), "loyalty_score".into()],
                vec![vec![
                    Value::text("1"),
                    Value::text("Male"),
                    Value::text("30"),
                    Value::text("02134"),
                    Value::text("3.5"),
                ]],
            ),
        );

        let dataset = Dataset::from_workbook(&wb).unwrap();
        assert_eq!(dataset.customers[0].city, "02134");
        assert_eq!(dataset.customers[0].age, 30);
        assert_eq!(dataset.customers[0].loyalty_score, 3.5);
    }

    #[test]
    fn test_null_order_date_is_fatal() {
        let mut wb = workbook();
        let mut orders = wb.sheet("orders").unwrap().clone();
        let col = orders.column_index("order_date").unwrap();
        orders.set(0, col, Value::Null);
        wb.insert("orders", orders);

        let err = Dataset::from_workbook(&wb).unwrap_err();
        assert!(err.to_string().contains("order_date"));
    }
}
