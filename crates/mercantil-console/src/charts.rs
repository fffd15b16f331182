//! Dashboard aggregations and bar chart geometry.

use std::collections::HashMap;

use chrono::Datelike;
use mercantil_common::{Customer, Order, Product, Supplier};
use serde::Serialize;
use tracing::debug;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const TOP_COUNTRIES: usize = 8;
const TOP_PRODUCTS: usize = 10;
const TOP_SUPPLIERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub customers: usize,
    pub orders: usize,
    pub products: usize,
    pub suppliers: usize,
}

/// Everything the home page and `/api/dashboard` show.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub stats: Stats,
    pub orders_by_month: Vec<ChartPoint>,
    pub customers_by_country: Vec<ChartPoint>,
    pub product_prices: Vec<ChartPoint>,
    pub supplier_activity: Vec<ChartPoint>,
    /// Sources that could not be fetched.
    pub unavailable: Vec<String>,
}

impl DashboardData {
    pub fn build(
        customers: &[Customer],
        products: &[Product],
        suppliers: &[Supplier],
        orders: &[Order],
    ) -> Self {
        Self {
            stats: Stats {
                customers: customers.len(),
                orders: orders.len(),
                products: products.len(),
                suppliers: suppliers.len(),
            },
            orders_by_month: orders_by_month(orders),
            customers_by_country: customers_by_country(customers),
            product_prices: product_prices(products),
            supplier_activity: supplier_activity(suppliers, products),
            unavailable: Vec::new(),
        }
    }
}

pub fn orders_by_month(orders: &[Order]) -> Vec<ChartPoint> {
    let mut buckets = [0u32; 12];
    for order in orders {
        match order.date() {
            Some(date) => buckets[date.month0() as usize] += 1,
            None => debug!(order_id = order.id, date = ?order.order_date, "Skipping order without a usable date"),
        }
    }
    MONTHS
        .iter()
        .zip(buckets)
        .map(|(month, count)| ChartPoint::new(*month, f64::from(count)))
        .collect()
}

pub fn customers_by_country(customers: &[Customer]) -> Vec<ChartPoint> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for customer in customers {
        let country = customer
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown");
        *counts.entry(country.to_string()).or_default() += 1;
    }
    top_counts(counts.into_iter().collect(), TOP_COUNTRIES)
}

pub fn product_prices(products: &[Product]) -> Vec<ChartPoint> {
    let mut priced: Vec<&Product> = products.iter().filter(|p| p.unit_price > 0.0).collect();
    priced.sort_by(|a, b| {
        b.unit_price
            .total_cmp(&a.unit_price)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    priced
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|p| ChartPoint::new(p.product_name.clone(), p.unit_price))
        .collect()
}

/// Products carried per supplier.
pub fn supplier_activity(suppliers: &[Supplier], products: &[Product]) -> Vec<ChartPoint> {
    let rows = suppliers
        .iter()
        .map(|s| {
            let count = products.iter().filter(|p| p.supplier_id == s.id).count() as u32;
            (s.company_name.clone(), count)
        })
        .collect();
    top_counts(rows, TOP_SUPPLIERS)
}

fn top_counts(mut rows: Vec<(String, u32)>, limit: usize) -> Vec<ChartPoint> {
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.into_iter()
        .take(limit)
        .map(|(label, count)| ChartPoint::new(label, f64::from(count)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Width as a percentage of the series maximum.
    pub percent: f64,
}

/// Bar geometry for a series. An all-zero series gets zero-width bars.
pub fn bars(points: &[ChartPoint]) -> Vec<Bar> {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|p| Bar {
            label: p.label.clone(),
            value: p.value,
            percent: if max > 0.0 { (p.value / max * 1000.0).round() / 10.0 } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order(id: i32, date: Option<&str>) -> Order {
        Order { id, order_date: date.map(str::to_string), ..Default::default() }
    }

    fn customer(country: Option<&str>) -> Customer {
        Customer { country: country.map(str::to_string), ..Default::default() }
    }

    #[test]
    fn test_orders_by_month_skips_bad_dates() {
        let orders = vec![
            order(1, Some("2024-01-15T10:00:00")),
            order(2, Some("2024-01-31")),
            order(3, Some("2023-12-01T00:00:00Z")),
            order(4, Some("yesterday")),
            order(5, None),
        ];
        let series = orders_by_month(&orders);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0], ChartPoint::new("Jan", 2.0));
        assert_eq!(series[11], ChartPoint::new("Dec", 1.0));
        assert_eq!(series.iter().map(|p| p.value).sum::<f64>(), 3.0);
    }

    #[test]
    fn test_countries_sorted_and_capped() {
        let mut customers = Vec::new();
        for (i, country) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"].iter().enumerate() {
            for _ in 0..=i {
                customers.push(customer(Some(country)));
            }
        }
        customers.push(customer(None));
        customers.push(customer(Some("  ")));

        let series = customers_by_country(&customers);
        assert_eq!(series.len(), 8);
        assert_eq!(series[0], ChartPoint::new("J", 10.0));
        assert_eq!(series[1], ChartPoint::new("I", 9.0));
        assert!(series.iter().all(|p| p.label != "Unknown"));
    }

    #[test]
    fn test_unknown_country_bucket() {
        let series = customers_by_country(&[customer(None), customer(Some("")), customer(Some("Mexico"))]);
        assert_eq!(series[0], ChartPoint::new("Unknown", 2.0));
        assert_eq!(series[1], ChartPoint::new("Mexico", 1.0));
    }

    #[test]
    fn test_product_prices_top_ten_positive() {
        let mut products: Vec<Product> = (1..=12)
            .map(|i| Product { id: i, product_name: format!("P{i:02}"), unit_price: f64::from(i), ..Default::default() })
            .collect();
        products.push(Product { id: 99, product_name: "Free".into(), unit_price: 0.0, ..Default::default() });

        let series = product_prices(&products);
        assert_eq!(series.len(), 10);
        assert_eq!(series[0], ChartPoint::new("P12", 12.0));
        assert_eq!(series[9], ChartPoint::new("P03", 3.0));
    }

    #[test]
    fn test_supplier_activity_counts_products() {
        let suppliers = vec![
            Supplier { id: 1, company_name: "Exotic Liquids".into(), ..Default::default() },
            Supplier { id: 2, company_name: "Tokyo Traders".into(), ..Default::default() },
            Supplier { id: 3, company_name: "Idle Co".into(), ..Default::default() },
        ];
        let products = vec![
            Product { id: 1, supplier_id: 2, ..Default::default() },
            Product { id: 2, supplier_id: 2, ..Default::default() },
            Product { id: 3, supplier_id: 1, ..Default::default() },
        ];
        let series = supplier_activity(&suppliers, &products);
        assert_eq!(
            series,
            vec![
                ChartPoint::new("Tokyo Traders", 2.0),
                ChartPoint::new("Exotic Liquids", 1.0),
                ChartPoint::new("Idle Co", 0.0),
            ]
        );
    }

    #[test]
    fn test_bars_scale_to_max() {
        let bars = bars(&[ChartPoint::new("a", 4.0), ChartPoint::new("b", 1.0), ChartPoint::new("c", 3.0)]);
        assert_eq!(bars[0].percent, 100.0);
        assert_eq!(bars[1].percent, 25.0);
        assert_eq!(bars[2].percent, 75.0);
    }

    #[test]
    fn test_bars_all_zero() {
        let bars = bars(&[ChartPoint::new("a", 0.0)]);
        assert_eq!(bars[0].percent, 0.0);
    }

    #[test]
    fn test_dashboard_stats() {
        let data = DashboardData::build(&[customer(Some("UK"))], &[], &[], &[order(1, None)]);
        assert_eq!(data.stats, Stats { customers: 1, orders: 1, products: 0, suppliers: 0 });
        assert!(data.unavailable.is_empty());
    }
}
