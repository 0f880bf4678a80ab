//! Store - CSV-backed, read-only data accessor
//!
//! The four tables are loaded once at startup. Primary keys are indexed so
//! that lookups by id are constant time; ids are compared after trimming
//! and upper-casing.

use crate::error::{Error, Result};
use crate::records::{Customer, Order, Product, RevenueRecord};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Human-readable description of the tables and their relationships
pub const SCHEMA_DESCRIPTION: &str = "\
DATA SCHEMA
1. customers: customer_id (PK), name, email, region
2. products: product_id (PK), name, category, price, stock_level
3. orders: order_id (PK), customer_id (FK -> customers), product_id (FK -> products), status, order_date, est_delivery
4. revenue: revenue_id (PK), order_id (FK -> orders), amount, date, payment_method

Order status values: Pending, Processing, Shipped, Out for Delivery, Delivered, Cancelled.
Dates use the YYYY-MM-DD format.";

/// Normalize a user-supplied identifier (`" cust_001 "` -> `"CUST_001"`)
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Immutable in-memory view of the business tables
#[derive(Debug, Default)]
pub struct DataStore {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    revenue: Vec<RevenueRecord>,
    customer_index: HashMap<String, usize>,
    product_index: HashMap<String, usize>,
    order_index: HashMap<String, usize>,
}

impl DataStore {
    /// Load all four tables from `dir`
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] when a file is absent, [`Error::Csv`]
    /// on malformed rows and [`Error::Integrity`] on duplicate primary keys.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!(dir = %dir.display(), "Loading data tables");

        let customers = read_table(dir, "customers.csv")?;
        let products = read_table(dir, "products.csv")?;
        let orders = read_table(dir, "orders.csv")?;
        let revenue = read_table(dir, "revenue.csv")?;

        let store = Self::from_tables(customers, products, orders, revenue)?;
        info!(
            customers = store.customers.len(),
            products = store.products.len(),
            orders = store.orders.len(),
            revenue = store.revenue.len(),
            "Data tables loaded"
        );
        Ok(store)
    }

    /// Build a store from already-parsed rows
    ///
    /// # Errors
    ///
    /// Returns [`Error::Integrity`] if a primary key occurs twice.
    pub fn from_tables(
        customers: Vec<Customer>,
        products: Vec<Product>,
        orders: Vec<Order>,
        revenue: Vec<RevenueRecord>,
    ) -> Result<Self> {
        let customer_index = build_index("customers", &customers, |c| &c.customer_id)?;
        let product_index = build_index("products", &products, |p| &p.product_id)?;
        let order_index = build_index("orders", &orders, |o| &o.order_id)?;

        // Dangling foreign keys are logged, not rejected.
        for order in &orders {
            if !customer_index.contains_key(&normalize_id(&order.customer_id)) {
                warn!(order_id = %order.order_id, customer_id = %order.customer_id, "Order references unknown customer");
            }
            if !product_index.contains_key(&normalize_id(&order.product_id)) {
                warn!(order_id = %order.order_id, product_id = %order.product_id, "Order references unknown product");
            }
        }

        Ok(Self {
            customers,
            products,
            orders,
            revenue,
            customer_index,
            product_index,
            order_index,
        })
    }

    /// All customers
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All products
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All orders
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// All revenue records
    #[must_use]
    pub fn revenue(&self) -> &[RevenueRecord] {
        &self.revenue
    }

    /// Look up a customer by id
    #[must_use]
    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customer_index
            .get(&normalize_id(customer_id))
            .map(|&i| &self.customers[i])
    }

    /// Look up a product by id
    #[must_use]
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.product_index
            .get(&normalize_id(product_id))
            .map(|&i| &self.products[i])
    }

    /// Look up an order by id
    #[must_use]
    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.order_index
            .get(&normalize_id(order_id))
            .map(|&i| &self.orders[i])
    }

    /// Orders placed by a customer, in file order
    #[must_use]
    pub fn orders_for_customer(&self, customer_id: &str) -> Vec<&Order> {
        let id = normalize_id(customer_id);
        self.orders
            .iter()
            .filter(|o| normalize_id(&o.customer_id) == id)
            .collect()
    }

    /// Revenue records attached to an order
    #[must_use]
    pub fn revenue_for_order(&self, order_id: &str) -> Vec<&RevenueRecord> {
        let id = normalize_id(order_id);
        self.revenue
            .iter()
            .filter(|r| normalize_id(&r.order_id) == id)
            .collect()
    }

    /// Open orders whose estimated delivery lies before `today`
    #[must_use]
    pub fn delayed_orders(&self, today: NaiveDate) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.days_overdue(today).is_some())
            .collect()
    }
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(Error::MissingTable(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&path)
        .map_err(|source| Error::Csv {
            table: file.to_string(),
            source,
        })?;

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|source| Error::Csv {
            table: file.to_string(),
            source,
        })?;

    debug!(table = file, rows = rows.len(), "Table parsed");
    Ok(rows)
}

fn build_index<T>(
    table: &str,
    rows: &[T],
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let id = normalize_id(key(row));
        if index.insert(id.clone(), i).is_some() {
            return Err(Error::Integrity(format!(
                "duplicate primary key '{id}' in {table}"
            )));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::OrderStatus;
    use std::fs;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn write_fixture(dir: &Path) {
        fs::write(
            dir.join("customers.csv"),
            "customer_id,name,email,region\n\
             CUST_001,Alice Smith,alice@example.com,North\n\
             CUST_002,Bob Jones,bob@example.com,South\n",
        )
        .unwrap();
        fs::write(
            dir.join("products.csv"),
            "product_id,name,category,price,stock_level\n\
             PROD_001,Laptop,Electronics,999.99,12\n\
             PROD_002,Desk,Furniture,250.00,4\n",
        )
        .unwrap();
        fs::write(
            dir.join("orders.csv"),
            "order_id,customer_id,product_id,status,order_date,est_delivery\n\
             ORD_1001,CUST_001,PROD_001,Shipped,2025-01-02,2025-01-06\n\
             ORD_1002,CUST_001,PROD_002,Delivered,2025-01-03,2025-01-07\n\
             ORD_1003,CUST_002,PROD_002,Pending,2025-01-04,\n",
        )
        .unwrap();
        fs::write(
            dir.join("revenue.csv"),
            "revenue_id,order_id,amount,date,payment_method\n\
             REV_1,ORD_1001,999.99,2025-01-02,Credit Card\n\
             REV_2,ORD_1002,250.00,2025-01-03,PayPal\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_tables() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let store = DataStore::load(dir.path()).unwrap();
        assert_eq!(store.customers().len(), 2);
        assert_eq!(store.products().len(), 2);
        assert_eq!(store.orders().len(), 3);
        assert_eq!(store.revenue().len(), 2);

        let order = store.order("ord_1003").unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.est_delivery, None);
    }

    #[test]
    fn test_lookup_normalizes_ids() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = DataStore::load(dir.path()).unwrap();

        assert_eq!(store.customer("  cust_001 ").unwrap().name, "Alice Smith");
        assert_eq!(store.product("PROD_002").unwrap().category, "Furniture");
        assert!(store.customer("CUST_999").is_none());
        assert_eq!(store.orders_for_customer("cust_001").len(), 2);
        assert_eq!(store.revenue_for_order("ORD_1002").len(), 1);
    }

    #[test]
    fn test_missing_table() {
        let dir = TempDir::new().unwrap();
        let err = DataStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingTable(_)));
    }

    #[test]
    fn test_malformed_row() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        fs::write(
            dir.path().join("products.csv"),
            "product_id,name,category,price,stock_level\nPROD_001,Laptop,Electronics,cheap,1\n",
        )
        .unwrap();

        let err = DataStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Csv { ref table, .. } if table == "products.csv"));
    }

    #[test]
    fn test_duplicate_primary_key() {
        let customer = Customer {
            customer_id: "CUST_001".to_string(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            region: "North".to_string(),
        };
        let mut dup = customer.clone();
        dup.customer_id = "cust_001".to_string();

        let err = DataStore::from_tables(vec![customer, dup], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
    }

    #[test]
    fn test_delayed_orders() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let store = DataStore::load(dir.path()).unwrap();

        let delayed = store.delayed_orders(date("2025-01-10"));
        assert_eq!(delayed.len(), 1);
        assert_eq!(delayed[0].order_id, "ORD_1001");

        assert!(store.delayed_orders(date("2025-01-05")).is_empty());
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id(" cust_001\t"), "CUST_001");
        assert_eq!(normalize_id(""), "");
    }
}
