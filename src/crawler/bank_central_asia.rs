use anyhow::{bail, Result};
use reqwest::header::HeaderMap;
use scraper::Html;

use crate::{
    config,
    declare::{Bank, ExchangeRate},
    error::ExchangeRateError,
    logging,
    util::{
        http::{self, element},
        text,
    },
};

/// 匯率表格的 class 組合
const TABLE_SELECTOR: &str =
    "table.m-table-kurs.m-table--sticky-first-coloumn.m-table-kurs--pad";

/// Extracts the e-Rate table of the Bank Central Asia `kurs` page.
///
/// Every `tr` of the table's first `tbody` with at least three `td` cells
/// becomes a row: currency label, buy rate, sell rate. Rates are parsed after
/// removing `thousands_separators`; a row whose rates do not parse is logged
/// and skipped, the remaining rows are still returned.
///
/// # Errors
///
/// [`ExchangeRateError::TableNotFound`] when the page carries no such table.
pub fn parse(html: &str, thousands_separators: &[char]) -> Result<Vec<ExchangeRate<f64>>> {
    let document = Html::parse_document(html);
    let table_selector = element::selector(TABLE_SELECTOR)?;
    let tbody_selector = element::selector("tbody")?;
    let tr_selector = element::selector("tr")?;
    let td_selector = element::selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ExchangeRateError::TableNotFound(Bank::BankCentralAsia.name()))?;

    let Some(tbody) = table.select(&tbody_selector).next() else {
        logging::warn_file_async("The BCA exchange rate table has no body".to_string());
        return Ok(Vec::new());
    };

    let rates = tbody
        .select(&tr_selector)
        .filter_map(|tr| {
            let cells: Vec<String> = tr
                .select(&td_selector)
                .map(|td| element::stripped_text(&td))
                .collect();

            if cells.len() < 3 {
                return None;
            }

            match parse_row(&cells, thousands_separators) {
                Ok(rate) => Some(rate),
                Err(why) => {
                    let msg = format!("Error converting rates to float: {:?}", why);
                    logging::error_console(msg.clone());
                    logging::error_file_async(msg);
                    None
                }
            }
        })
        .collect();

    Ok(rates)
}

/// Converts the text of one table row into an [`ExchangeRate`].
fn parse_row(cells: &[String], thousands_separators: &[char]) -> Result<ExchangeRate<f64>> {
    let [currency, buy_rate, sell_rate, ..] = cells else {
        bail!("Insufficient data in row: {:?}", cells);
    };

    Ok(ExchangeRate {
        currency: currency.trim().to_string(),
        buy_rate: text::parse_f64(buy_rate, thousands_separators)?,
        sell_rate: text::parse_f64(sell_rate, thousands_separators)?,
    })
}

/// 取得中亞銀行網頁上的 e-Rate 匯率
pub async fn visit(app: &config::App) -> Result<Vec<ExchangeRate<f64>>> {
    let url = &app.bank_central_asia.url;
    let mut headers = HeaderMap::new();
    headers.insert("Referer", url.parse()?);

    let text = http::get(url, Some(headers)).await?;
    let rates = parse(&text, &app.parse.thousands_separators)?;

    logging::info_file_async(format!("{} rows parsed from {}", rates.len(), url));

    Ok(rates)
}
