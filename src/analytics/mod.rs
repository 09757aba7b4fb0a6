//! Inventory analytics over parquet datasets
//!
//! Queries over an `inventory` dataset (`date`, `site`, `user_id`,
//! `is_logged_in`, `is_mobile_app`, `device_type`, `order_id`, `event`) and a
//! `selected_users` dataset (`user_id`), built on polars lazy frames.

pub mod queries;
pub mod report;

pub use queries::{
    load_data, logged_in_percentage, mobile_app_share, non_selected_user_clicks_per_day,
    selected_user_clicks_per_day, top_logged_in_site, with_identity_type, with_max_order_id,
};
pub use report::{ExportedTable, InventoryReport};

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn inventory() -> LazyFrame {
        df!(
            "date" => &["2024-01-01", "2024-01-01", "2024-01-02", "2024-01-02", "2024-01-02"],
            "site" => &["a.com", "b.com", "b.com", "b.com", "a.com"],
            "user_id" => &[1i64, 2, 3, 1, 4],
            "is_logged_in" => &[true, false, true, true, false],
            "is_mobile_app" => &[true, false, false, true, false],
            "device_type" => &["Mobile Phone", "Desktop", "Mobile Phone", "Tablet", "Desktop"],
            "order_id" => &[10i64, 20, 30, 40, 50],
            "event" => &["click", "view", "click", "click", "click"]
        )
        .unwrap()
        .lazy()
    }

    fn selected_users() -> LazyFrame {
        df!("user_id" => &[1i64, 3]).unwrap().lazy()
    }

    fn counts(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
        df.column(column)
            .unwrap()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_logged_in_percentage() {
        let out = logged_in_percentage(inventory()).collect().unwrap();
        let pct: Vec<Option<f64>> = out
            .column("logged_in_percentage")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();

        assert_eq!(strings(&out, "date"), vec!["2024-01-01", "2024-01-02"]);
        assert!((pct[0].unwrap() - 50.0).abs() < 1e-9);
        assert!((pct[1].unwrap() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_logged_in_site() {
        let out = top_logged_in_site(inventory()).collect().unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(strings(&out, "site"), vec!["b.com"]);
        assert_eq!(counts(&out, "count"), vec![Some(2)]);
    }

    #[test]
    fn test_mobile_app_share() {
        let share = mobile_app_share(inventory()).unwrap().unwrap();
        assert!((share - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mobile_app_share_without_logged_in_users() {
        let df = df!(
            "is_logged_in" => &[false, false],
            "is_mobile_app" => &[true, false]
        )
        .unwrap()
        .lazy();
        assert_eq!(mobile_app_share(df).unwrap(), None);
    }

    #[test]
    fn test_identity_type() {
        let out = with_identity_type(inventory()).collect().unwrap();
        assert_eq!(
            strings(&out, "identity_type"),
            vec![
                "Mobile Phone App",
                "Desktop",
                "Mobile Phone Web",
                "Unknown",
                "Desktop"
            ]
        );
    }

    #[test]
    fn test_max_order_id() {
        let out = with_max_order_id(with_identity_type(inventory()))
            .sort("order_id", SortOptions::default())
            .collect()
            .unwrap();

        assert_eq!(out.height(), 5);
        assert_eq!(
            counts(&out, "max_order_id"),
            vec![Some(10), Some(50), Some(30), Some(40), Some(50)]
        );
    }

    #[test]
    fn test_selected_user_clicks() {
        let out = selected_user_clicks_per_day(inventory(), selected_users())
            .collect()
            .unwrap();
        assert_eq!(strings(&out, "date"), vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(counts(&out, "count"), vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_non_selected_user_clicks() {
        let out = non_selected_user_clicks_per_day(inventory(), selected_users())
            .collect()
            .unwrap();
        assert_eq!(strings(&out, "date"), vec!["2024-01-02"]);
        assert_eq!(counts(&out, "count"), vec![Some(1)]);
    }
}
