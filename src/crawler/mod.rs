use std::path::PathBuf;

use anyhow::Result;

use crate::{config, declare::Bank, export, logging};

/// 中亞銀行 (Bank Central Asia)
pub mod bank_central_asia;
/// 印尼央行 (Bank Indonesia)
pub mod bank_indonesia;

/// Resolves `identifier`, fetches that bank's rates and writes them to its
/// CSV file under the configured output directory.
///
/// An unknown identifier fails before any request is made, and nothing is
/// written unless the fetch and the parse both succeed.
pub async fn run(identifier: &str, app: &config::App) -> Result<PathBuf> {
    let bank = Bank::parse(identifier)?;
    fetch_and_export(bank, app).await
}

/// 抓取一家銀行的匯率並輸出成 CSV，回傳輸出檔的路徑
pub async fn fetch_and_export(bank: Bank, app: &config::App) -> Result<PathBuf> {
    let output = app.output.path().join(bank.file_name());

    let count = match bank {
        Bank::BankIndonesia => {
            let rates = bank_indonesia::visit(app).await?;
            export::write_csv(&output, &rates)?
        }
        Bank::BankCentralAsia => {
            let rates = bank_central_asia::visit(app).await?;
            export::write_csv(&output, &rates)?
        }
    };

    logging::info_file_async(format!(
        "{} rows of {} saved to {}",
        count,
        bank.name(),
        output.display()
    ));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::Local;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::error::ExchangeRateError;

    fn app_for(server: &MockServer, output: &tempfile::TempDir) -> config::App {
        let mut app = config::App::default();
        app.bank_indonesia.url = format!(
            "{}/biwebservice/wskursbi.asmx/getSubKursAsing2",
            server.uri()
        );
        app.bank_central_asia.url = format!("{}/id/informasi/kurs", server.uri());
        app.output.dir = output.path().to_string_lossy().to_string();
        app
    }

    #[tokio::test]
    async fn test_run_bank_indonesia() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();

        Mock::given(method("GET"))
            .and(path("/biwebservice/wskursbi.asmx/getSubKursAsing2"))
            .and(query_param("tgl", today.as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(bank_indonesia::tests::SAMPLE),
            )
            .expect(1)
            .mount(&server)
            .await;

        let saved = run(" BI ", &app_for(&server, &output)).await.unwrap();

        assert_eq!(saved, output.path().join("bank_indonesia_exchange_rates.csv"));
        assert_eq!(
            fs::read_to_string(saved).unwrap(),
            "Currency,Buy Rate,Sell Rate\n\
             AUD,10359.37,10463.85\n\
             USD,15657.57,15815.43\n\
             CNY,2181.07,\n"
        );
    }

    #[tokio::test]
    async fn test_run_bank_central_asia() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/id/informasi/kurs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(bank_central_asia::tests::SAMPLE),
            )
            .expect(1)
            .mount(&server)
            .await;

        let saved = run("bca", &app_for(&server, &output)).await.unwrap();

        assert_eq!(saved, output.path().join("bank_central_asia_exchange_rates.csv"));
        assert_eq!(
            fs::read_to_string(saved).unwrap(),
            "Currency,Buy Rate,Sell Rate\n\
             USD,15655.0,15675.0\n\
             SGD,11631.43,11653.48\n\
             EUR,16998.25,17039.65\n"
        );
    }

    #[tokio::test]
    async fn test_run_unknown_bank() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let why = run("mandiri", &app_for(&server, &output)).await.unwrap_err();

        assert_eq!(
            why.downcast_ref::<ExchangeRateError>(),
            Some(&ExchangeRateError::UnknownBank("mandiri".to_string()))
        );
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_not_found_status() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let app = app_for(&server, &output);
        for identifier in ["bi", "bca"] {
            let why = run(identifier, &app).await.unwrap_err();
            assert!(why.to_string().contains("404"));
            assert!(matches!(
                why.downcast_ref::<ExchangeRateError>(),
                Some(ExchangeRateError::HttpStatus { status: 404, .. })
            ));
        }

        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_run_table_not_found() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let why = run("BCA", &app_for(&server, &output)).await.unwrap_err();

        assert_eq!(
            why.to_string(),
            "Exchange rate table not found on the Bank Central Asia website."
        );
        assert!(!output
            .path()
            .join("bank_central_asia_exchange_rates.csv")
            .exists());
    }

    #[tokio::test]
    async fn test_run_overwrites_previous_output() {
        let server = MockServer::start().await;
        let output = tempfile::tempdir().unwrap();
        let previous = output.path().join("bank_central_asia_exchange_rates.csv");
        fs::write(&previous, "stale\nstale\nstale\nstale\nstale\nstale\n").unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<table class="m-table-kurs m-table--sticky-first-coloumn m-table-kurs--pad">
                     <tbody><tr><td>US Dollar</td><td>15,500</td><td>15,300</td></tr></tbody>
                   </table>"#,
            ))
            .mount(&server)
            .await;

        run("bca", &app_for(&server, &output)).await.unwrap();

        assert_eq!(
            fs::read_to_string(previous).unwrap(),
            "Currency,Buy Rate,Sell Rate\nUS Dollar,15500.0,15300.0\n"
        );
    }
}
