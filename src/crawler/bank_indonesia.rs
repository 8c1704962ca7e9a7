use anyhow::{Context, Result};
use chrono::Local;
use quick_xml::{events::Event, Reader};

use crate::{
    config,
    declare::{Bank, ExchangeRate},
    logging,
    util::http,
};

/// 每一筆匯率資料的節點名稱
const RECORD: &[u8] = b"Table";

#[derive(Debug, Copy, Clone, PartialEq)]
enum Field {
    /// 幣別代碼
    Currency,
    /// 買入匯率
    BuyRate,
    /// 賣出匯率
    SellRate,
}

impl Field {
    fn from_tag(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"mts_subkursasing" => Some(Field::Currency),
            b"beli_subkursasing" => Some(Field::BuyRate),
            b"jual_subkursasing" => Some(Field::SellRate),
            _ => None,
        }
    }
}

/// One `<Table>` element being read.
///
/// Only the first occurrence of each field is kept; its value is the whole
/// text content of that element, nested markup included.
#[derive(Default, Debug)]
struct Record {
    /// 目前位於 Table 之下的層數
    depth: usize,
    /// 正在讀取的欄位及其所在層數
    reading: Option<(Field, usize)>,
    currency: Option<String>,
    buy_rate: Option<String>,
    sell_rate: Option<String>,
}

impl Record {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Currency => &mut self.currency,
            Field::BuyRate => &mut self.buy_rate,
            Field::SellRate => &mut self.sell_rate,
        }
    }

    fn open(&mut self, local_name: &[u8]) {
        self.depth += 1;

        if self.reading.is_some() {
            return;
        }

        if let Some(field) = Field::from_tag(local_name) {
            let depth = self.depth;
            let slot = self.slot(field);
            if slot.is_none() {
                *slot = Some(String::new());
                self.reading = Some((field, depth));
            }
        }
    }

    fn close(&mut self) {
        if matches!(self.reading, Some((_, depth)) if depth == self.depth) {
            self.reading = None;
        }

        self.depth = self.depth.saturating_sub(1);
    }

    fn push_text(&mut self, text: &str) {
        if let Some((field, _)) = self.reading {
            if let Some(value) = self.slot(field) {
                value.push_str(text);
            }
        }
    }

    fn into_exchange_rate(self) -> ExchangeRate<String> {
        ExchangeRate {
            currency: self.currency.unwrap_or_default().trim().to_string(),
            buy_rate: self.buy_rate.unwrap_or_default(),
            sell_rate: self.sell_rate.unwrap_or_default(),
        }
    }
}

/// Extracts every `<Table>` record of the Bank Indonesia `getSubKursAsing2`
/// data set, in document order.
///
/// Records are matched on their local name, so the `xs:element name="Table"`
/// entries of the embedded schema are not mistaken for data. A `<Table>`
/// nested in another one is a record of its own, listed after its parent.
/// Rates are kept verbatim; a missing field becomes an empty string and text
/// holding an unknown entity is kept as written.
pub fn parse(xml: &str) -> Result<Vec<ExchangeRate<String>>> {
    let mut reader = Reader::from_str(xml);
    let mut rates: Vec<ExchangeRate<String>> = Vec::new();
    // 尚未結束的 Table 及其在 rates 中的位置
    let mut open: Vec<(usize, Record)> = Vec::new();

    loop {
        let event = reader.read_event().with_context(|| {
            format!(
                "Failed to read Bank Indonesia XML at position {}",
                reader.buffer_position()
            )
        })?;

        match event {
            Event::Start(e) => {
                let local_name = e.local_name();
                for (_, r) in open.iter_mut() {
                    r.open(local_name.as_ref());
                }

                if local_name.as_ref() == RECORD {
                    rates.push(Record::default().into_exchange_rate());
                    open.push((rates.len() - 1, Record::default()));
                }
            }
            Event::Empty(e) => {
                let local_name = e.local_name();
                for (_, r) in open.iter_mut() {
                    r.open(local_name.as_ref());
                    r.close();
                }

                if local_name.as_ref() == RECORD {
                    rates.push(Record::default().into_exchange_rate());
                }
            }
            Event::End(_) => {
                // 最內層的 Table 已無未關閉的子節點，這個 End 就是它自己的結尾
                if matches!(open.last(), Some((_, r)) if r.depth == 0) {
                    if let Some((index, r)) = open.pop() {
                        rates[index] = r.into_exchange_rate();
                    }
                }

                for (_, r) in open.iter_mut() {
                    r.close();
                }
            }
            Event::Text(t) => {
                if open.iter().any(|(_, r)| r.reading.is_some()) {
                    let text = t
                        .unescape()
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned().into());
                    for (_, r) in open.iter_mut() {
                        r.push_text(&text);
                    }
                }
            }
            Event::CData(c) => {
                if open.iter().any(|(_, r)| r.reading.is_some()) {
                    let text = String::from_utf8_lossy(&c);
                    for (_, r) in open.iter_mut() {
                        r.push_text(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // 文件被截斷時仍保留尚未結束的記錄
    for (index, r) in open {
        rates[index] = r.into_exchange_rate();
    }

    Ok(rates)
}

/// 取得印尼央行當日的外幣匯率
pub async fn visit(app: &config::App) -> Result<Vec<ExchangeRate<String>>> {
    let url = Bank::BankIndonesia.url(app, Local::now().date_naive());
    let text = http::get(&url, None).await?;
    let rates = parse(&text)?;

    logging::info_file_async(format!("{} records parsed from {}", rates.len(), url));

    Ok(rates)
}
