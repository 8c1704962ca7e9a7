use std::{env, path::PathBuf};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct App {
    #[serde(default = "Source::bank_indonesia")]
    pub bank_indonesia: Source,
    #[serde(default = "Source::bank_central_asia")]
    pub bank_central_asia: Source,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub parse: Parse,
}

impl Default for App {
    fn default() -> Self {
        App {
            bank_indonesia: Source::bank_indonesia(),
            bank_central_asia: Source::bank_central_asia(),
            output: Output::default(),
            parse: Parse::default(),
        }
    }
}

const BANK_INDONESIA_URL: &str = "BANK_INDONESIA_URL";
const BANK_CENTRAL_ASIA_URL: &str = "BANK_CENTRAL_ASIA_URL";

/// 匯率資料來源
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Source {
    pub url: String,
}

impl Source {
    fn bank_indonesia() -> Self {
        Source {
            url: "https://www.bi.go.id/biwebservice/wskursbi.asmx/getSubKursAsing2".to_string(),
        }
    }

    fn bank_central_asia() -> Self {
        Source {
            url: "https://www.bca.co.id/id/informasi/kurs".to_string(),
        }
    }
}

const OUTPUT_DIR: &str = "OUTPUT_DIR";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Output {
    #[serde(default = "Output::default_dir")]
    pub dir: String,
}

impl Output {
    fn default_dir() -> String {
        ".".to_string()
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.dir)
    }
}

impl Default for Output {
    fn default() -> Self {
        Output {
            dir: Output::default_dir(),
        }
    }
}

const THOUSANDS_SEPARATORS: &str = "THOUSANDS_SEPARATORS";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Parse {
    /// 解析數字前要移除的千分位符號
    #[serde(default = "Parse::default_thousands_separators")]
    pub thousands_separators: Vec<char>,
}

impl Parse {
    fn default_thousands_separators() -> Vec<char> {
        vec![',']
    }
}

impl Default for Parse {
    fn default() -> Self {
        Parse {
            thousands_separators: Parse::default_thousands_separators(),
        }
    }
}

impl App {
    /// Loads `app.json` when it exists, falls back to the defaults otherwise,
    /// and lets environment variables override either.
    pub fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(url) = env::var(BANK_INDONESIA_URL) {
            self.bank_indonesia.url = url;
        }

        if let Ok(url) = env::var(BANK_CENTRAL_ASIA_URL) {
            self.bank_central_asia.url = url;
        }

        if let Ok(dir) = env::var(OUTPUT_DIR) {
            self.output.dir = dir;
        }

        if let Ok(separators) = env::var(THOUSANDS_SEPARATORS) {
            let separators: Vec<char> = separators
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if separators.is_empty() {
                logging::error_file_async(format!(
                    "Ignoring empty {} override",
                    THOUSANDS_SEPARATORS
                ));
            } else {
                self.parse.thousands_separators = separators;
            }
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
