use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::declare::{ExchangeRate, CSV_HEADERS};

/// Writes `rates` to `path` as CSV, replacing any previous file.
///
/// The header row is always written, even when there are no rates, and the
/// parent directory is created on demand. Returns the number of data rows.
pub fn write_csv<T: Serialize>(path: &Path, rates: &[ExchangeRate<T>]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    // 標題列自行寫入，沒有資料時也會有標題
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(CSV_HEADERS)?;
    for rate in rates {
        writer.serialize(rate)?;
    }
    writer.flush()?;

    Ok(rates.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank_indonesia_exchange_rates.csv");
        let rates = vec![
            ExchangeRate {
                currency: "AUD".to_string(),
                buy_rate: "10359.37".to_string(),
                sell_rate: "10463.85".to_string(),
            },
            ExchangeRate {
                currency: "CNY".to_string(),
                buy_rate: "2181.07".to_string(),
                sell_rate: String::new(),
            },
        ];

        assert_eq!(write_csv(&path, &rates).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Currency,Buy Rate,Sell Rate\nAUD,10359.37,10463.85\nCNY,2181.07,\n"
        );
    }

    #[test]
    fn test_write_numeric_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank_central_asia_exchange_rates.csv");
        let rates = vec![
            ExchangeRate {
                currency: "US Dollar".to_string(),
                buy_rate: 15500.0,
                sell_rate: 15300.0,
            },
            ExchangeRate {
                currency: "Won, Korea".to_string(),
                buy_rate: 11.72,
                sell_rate: 11.95,
            },
        ];

        write_csv(&path, &rates).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Currency,Buy Rate,Sell Rate\nUS Dollar,15500.0,15300.0\n\"Won, Korea\",11.72,11.95\n"
        );
    }

    #[test]
    fn test_write_empty_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rates.csv");

        let rates = vec![ExchangeRate {
            currency: "USD".to_string(),
            buy_rate: 1.0,
            sell_rate: 2.0,
        }];
        write_csv(&path, &rates).unwrap();

        let empty: Vec<ExchangeRate<f64>> = Vec::new();
        assert_eq!(write_csv(&path, &empty).unwrap(), 0);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Currency,Buy Rate,Sell Rate\n"
        );
    }
}
