//! Inventory queries
//!
//! Every query takes and returns a [`LazyFrame`], so nothing is computed until
//! the caller collects. Grouped results are sorted by their key.

use crate::error::Result;
use polars::prelude::*;
use std::path::Path;

/// Scan both datasets lazily
pub fn load_data<P, Q>(inventory_path: P, users_path: Q) -> Result<(LazyFrame, LazyFrame)>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let inventory = LazyFrame::scan_parquet(inventory_path.as_ref(), ScanArgsParquet::default())?;
    let selected_users = LazyFrame::scan_parquet(users_path.as_ref(), ScanArgsParquet::default())?;
    Ok((inventory, selected_users))
}

/// Percentage of logged-in rows per `date`
///
/// Rows with a null `is_logged_in` count as not logged in.
pub fn logged_in_percentage(df: LazyFrame) -> LazyFrame {
    df.group_by([col("date")])
        .agg([(col("is_logged_in")
            .fill_null(lit(false))
            .cast(DataType::Float64)
            .mean()
            * lit(100.0))
        .alias("logged_in_percentage")])
        .sort("date", SortOptions::default())
}

/// The site with the most logged-in rows, as (`site`, `count`)
///
/// Ties resolve to the alphabetically first site.
pub fn top_logged_in_site(df: LazyFrame) -> LazyFrame {
    df.filter(col("is_logged_in"))
        .group_by([col("site")])
        .agg([col("is_logged_in").count().alias("count")])
        .sort("site", SortOptions::default())
        .sort(
            "count",
            SortOptions {
                descending: true,
                maintain_order: true,
                ..Default::default()
            },
        )
        .limit(1)
}

/// Percentage of logged-in rows that come from the mobile app
///
/// `None` when no row is logged in.
pub fn mobile_app_share(df: LazyFrame) -> Result<Option<f64>> {
    let logged_in = df.clone().filter(col("is_logged_in")).collect()?.height();
    if logged_in == 0 {
        return Ok(None);
    }
    let mobile = df
        .filter(col("is_logged_in").and(col("is_mobile_app")))
        .collect()?
        .height();
    Ok(Some(mobile as f64 / logged_in as f64 * 100.0))
}

/// Add `identity_type` derived from `device_type` and `is_mobile_app`
pub fn with_identity_type(df: LazyFrame) -> LazyFrame {
    let mobile_phone = col("device_type").eq(lit("Mobile Phone"));
    df.with_column(
        when(mobile_phone.clone().and(col("is_mobile_app")))
            .then(lit("Mobile Phone App"))
            .when(mobile_phone.and(col("is_mobile_app").not()))
            .then(lit("Mobile Phone Web"))
            .when(col("device_type").eq(lit("Desktop")))
            .then(lit("Desktop"))
            .otherwise(lit("Unknown"))
            .alias("identity_type"),
    )
}

/// Join the highest `order_id` of each `identity_type` onto every row
pub fn with_max_order_id(df: LazyFrame) -> LazyFrame {
    let max_ids = df
        .clone()
        .group_by([col("identity_type")])
        .agg([col("order_id").max().alias("max_order_id")]);
    df.join(
        max_ids,
        [col("identity_type")],
        [col("identity_type")],
        JoinArgs::new(JoinType::Inner),
    )
}

fn clicks_per_day(df: LazyFrame) -> LazyFrame {
    df.filter(col("event").eq(lit("click")))
        .group_by([col("date")])
        .agg([col("event").count().alias("count")])
        .sort("date", SortOptions::default())
}

/// Click events per `date` for users present in `selected_users`
pub fn selected_user_clicks_per_day(df: LazyFrame, selected_users: LazyFrame) -> LazyFrame {
    let joined = df.join(
        selected_users,
        [col("user_id")],
        [col("user_id")],
        JoinArgs::new(JoinType::Inner),
    );
    clicks_per_day(joined)
}

/// Click events per `date` for users absent from `selected_users`
pub fn non_selected_user_clicks_per_day(df: LazyFrame, selected_users: LazyFrame) -> LazyFrame {
    let remaining = df.join(
        selected_users,
        [col("user_id")],
        [col("user_id")],
        JoinArgs::new(JoinType::Anti),
    );
    clicks_per_day(remaining)
}
