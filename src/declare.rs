use std::str::FromStr;

use chrono::NaiveDate;
use concat_string::concat_string;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{config, error::ExchangeRateError};

/// CSV 標題列
pub const CSV_HEADERS: [&str; 3] = ["Currency", "Buy Rate", "Sell Rate"];

/// 匯率資料來源的銀行
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Bank {
    /// 印尼央行 (XML web service)
    #[strum(serialize = "bi", to_string = "BI")]
    BankIndonesia,
    /// 中亞銀行 (HTML 匯率頁)
    #[strum(serialize = "bca", to_string = "BCA")]
    BankCentralAsia,
}

impl Bank {
    /// Resolves a user supplied identifier such as `" BCA "` into a [`Bank`].
    ///
    /// Surrounding whitespace is ignored and the match is case-insensitive;
    /// anything else is reported as [`ExchangeRateError::UnknownBank`].
    pub fn parse(identifier: &str) -> Result<Self, ExchangeRateError> {
        let identifier = identifier.trim();
        Bank::from_str(identifier)
            .map_err(|_| ExchangeRateError::UnknownBank(identifier.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bank::BankIndonesia => "Bank Indonesia",
            Bank::BankCentralAsia => "Bank Central Asia",
        }
    }

    /// 輸出的 CSV 檔名
    pub fn file_name(&self) -> &'static str {
        match self {
            Bank::BankIndonesia => "bank_indonesia_exchange_rates.csv",
            Bank::BankCentralAsia => "bank_central_asia_exchange_rates.csv",
        }
    }

    /// Builds the request URL. The Bank Indonesia feed is queried by date
    /// (`tgl=YYYY-MM-DD`), the Bank Central Asia page is static.
    pub fn url(&self, app: &config::App, date: NaiveDate) -> String {
        match self {
            Bank::BankIndonesia => concat_string!(
                app.bank_indonesia.url,
                "?tgl=",
                date.format("%Y-%m-%d").to_string()
            ),
            Bank::BankCentralAsia => app.bank_central_asia.url.clone(),
        }
    }

    /// `BI (Bank Indonesia), BCA (Bank Central Asia)`
    pub fn describe_all() -> String {
        Bank::iter()
            .map(|bank| format!("{} ({})", bank, bank.name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 單一幣別的買入、賣出匯率
///
/// `T` is `String` for sources whose rates are passed through verbatim and
/// `f64` for sources whose rates are parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate<T> {
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Buy Rate")]
    pub buy_rate: T,
    #[serde(rename = "Sell Rate")]
    pub sell_rate: T,
}
