use thiserror::Error;

/// Failures a run reports to the user before giving up.
///
/// They travel inside `anyhow::Error` like everything else in the crate; the
/// console layer and the tests recover them with `downcast_ref`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExchangeRateError {
    #[error("Invalid bank name '{0}'. Please choose between BI and BCA.")]
    UnknownBank(String),

    #[error("Failed to retrieve data from {url}. Status code: {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Exchange rate table not found on the {0} website.")]
    TableNotFound(&'static str),
}
