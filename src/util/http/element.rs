use anyhow::{anyhow, Result};
use scraper::{ElementRef, Selector};

/// Parses a CSS selector, turning the borrowed parse error into an owned one.
pub fn selector(css_selector: &str) -> Result<Selector> {
    Selector::parse(css_selector)
        .map_err(|why| anyhow!("Failed to Selector::parse({}) because: {:?}", css_selector, why))
}

/// Collects the text of an element the way a browser user reads it.
///
/// Every text node under `element` is trimmed and the non-empty pieces are
/// joined without a separator, so markup such as
/// `<td> <span>USD</span>\n <img/> </td>` yields `"USD"`.
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    #[test]
    fn test_stripped_text() {
        let fragment = Html::parse_fragment(
            r#"<div class="cell">
                  <span> US Dollar </span>
                  <img src="usd.png"/>
               </div>
               <div class="rate"><p>15,500</p><p>.00</p></div>"#,
        );

        let cell = fragment.select(&selector("div.cell").unwrap()).next().unwrap();
        assert_eq!(stripped_text(&cell), "US Dollar");

        let rate = fragment.select(&selector("div.rate").unwrap()).next().unwrap();
        assert_eq!(stripped_text(&rate), "15,500.00");
    }

    #[test]
    fn test_selector_error() {
        let why = selector("table..broken").unwrap_err();
        assert!(why.to_string().contains("table..broken"));
    }
}
