#![allow(dead_code)]

use assert_fs::{prelude::*, TempDir};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Three dated sales, one cancelled sale, and one outside the trailing year.
pub static SALES: Lazy<Value> = Lazy::new(|| {
    json!({
        "data": [
            { "id": 1, "orderDate": "2024-01-05", "total": 100, "profit": 20, "paymentMethod": "cash" },
            { "id": 2, "orderDate": "2024-01-05T09:15:00", "total": 50, "profit": 10, "paymentMethod": "" },
            { "id": 3, "orderDate": "2024-02-10T16:00:00+07:00", "total": 200, "profit": 40, "paymentMethod": "Online" },
            { "id": 4, "orderDate": "2024-02-12", "total": 70, "profit": 7, "status": "cancelled" },
            { "id": 5, "orderDate": "2022-06-01", "total": 999, "profit": 1 }
        ]
    })
});

pub static FORECAST: Lazy<Value> = Lazy::new(|| {
    json!([
        { "periodIdentifier": "2024-03", "forecastedRevenue": 300, "forecastedProfit": 60, "forecastedSalesCount": 9, "confidenceLevel": 0.8 },
        { "periodIdentifier": "2024-04", "forecastedRevenue": 320, "forecastedProfit": 64, "forecastedSalesCount": 10, "confidenceLevel": 0.7 }
    ])
});

pub const ANCHOR: &str = "2024-02-15";

/// Writes the sales, forecast and an empty config into a fresh temp dir.
pub fn feed_dir() -> TempDir {
    let temp = TempDir::new().expect("create temp dir");
    temp.child("sales.json")
        .write_str(&SALES.to_string())
        .expect("write sales");
    temp.child("forecast.json")
        .write_str(&FORECAST.to_string())
        .expect("write forecast");
    temp.child("config.json").write_str("{}").expect("write config");
    temp
}

pub fn path_arg(temp: &TempDir, name: &str) -> String {
    temp.child(name).path().display().to_string()
}
