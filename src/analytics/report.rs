//! Inventory report runner - executes every query and exports the result tables

use super::queries::*;
use crate::error::Result;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// One exported result table
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTable {
    pub name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// The inventory and selected-users datasets
pub struct InventoryReport {
    inventory: LazyFrame,
    selected_users: LazyFrame,
}

impl InventoryReport {
    pub fn new(inventory: LazyFrame, selected_users: LazyFrame) -> Self {
        Self {
            inventory,
            selected_users,
        }
    }

    /// Scan both datasets from parquet files
    pub fn from_parquet<P: AsRef<Path>, Q: AsRef<Path>>(inventory: P, users: Q) -> Result<Self> {
        let (inventory, selected_users) = load_data(inventory, users)?;
        Ok(Self::new(inventory, selected_users))
    }

    /// Run all tasks and write one CSV per result table into `out_dir`
    pub fn run(&self, out_dir: &Path) -> Result<Vec<ExportedTable>> {
        fs::create_dir_all(out_dir)?;
        let mut exported = Vec::new();

        log::info!("Task 1: logged-in percentage per day");
        let mut task1 = logged_in_percentage(self.inventory.clone()).collect()?;
        exported.push(export(&mut task1, "task_1", out_dir)?);

        log::info!("Task 2: site with most logged-in users");
        let mut task2 = top_logged_in_site(self.inventory.clone()).collect()?;
        exported.push(export(&mut task2, "task_2", out_dir)?);

        log::info!("Task 3: share of logged-in users on the mobile app");
        let share = mobile_app_share(self.inventory.clone())?;
        if share.is_none() {
            log::warn!("No logged-in users; mobile app share is undefined");
        }
        let mut task3 = df!("task_3_share" => &[share])?;
        exported.push(export(&mut task3, "task_3", out_dir)?);

        log::info!("Tasks 4 and 5: identity type and max order id");
        let enriched = with_max_order_id(with_identity_type(self.inventory.clone()));
        let mut tasks45 = enriched.clone().collect()?;
        exported.push(export(&mut tasks45, "tasks_4_and_5", out_dir)?);

        log::info!("Task 6: clicks per day for selected users");
        let mut task6 =
            selected_user_clicks_per_day(enriched.clone(), self.selected_users.clone()).collect()?;
        exported.push(export(&mut task6, "task_6", out_dir)?);

        log::info!("Task 7: clicks per day for non-selected users");
        let mut task7 =
            non_selected_user_clicks_per_day(enriched, self.selected_users.clone()).collect()?;
        exported.push(export(&mut task7, "task_7", out_dir)?);

        Ok(exported)
    }
}

fn export(df: &mut DataFrame, name: &'static str, out_dir: &Path) -> Result<ExportedTable> {
    let path = out_dir.join(format!("{}.csv", name));
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    log::info!("Wrote {} ({} rows)", path.display(), df.height());

    Ok(ExportedTable {
        name,
        path,
        rows: df.height(),
    })
}
