use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{normalize, ResponseTableBuilder};
use crate::error::{Result, StockbotError};
use crate::menu::{GO_BACK, MENU};

const EMBEDDED_STOCKS: &str = include_str!("../data/stock-data.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(rename = "stockName")]
    pub name: String,
    pub price: f64,
    /// Extra lookup keys such as the ticker symbol.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Stock {
    pub fn price_message(&self) -> String {
        format!("Stock price of {} is {}", self.name, self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    #[serde(rename = "stockExchange")]
    pub name: String,
    #[serde(rename = "topStocks")]
    pub stocks: Vec<Stock>,
}

impl Exchange {
    fn listing_message(&self) -> String {
        if self.stocks.is_empty() {
            return format!("{} has no stocks listed.", self.name);
        }
        let names: Vec<&str> = self.stocks.iter().map(|s| s.name.as_str()).collect();
        format!("{} lists: {}", self.name, names.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct StockCatalog {
    exchanges: Vec<Exchange>,
}

impl StockCatalog {
    pub fn new(exchanges: Vec<Exchange>) -> Result<Self> {
        validate(&exchanges)?;
        Ok(Self { exchanges })
    }

    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let exchanges: Vec<Exchange> =
            serde_json::from_str(json).map_err(|source| StockbotError::Json {
                origin: origin.to_string(),
                source,
            })?;
        Self::new(exchanges)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| StockbotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            exchanges = catalog.exchanges.len(),
            "stock catalog loaded"
        );
        Ok(catalog)
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_STOCKS, "embedded stock data")
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn exchange(&self, name: &str) -> Option<&Exchange> {
        let wanted = normalize(name);
        self.exchanges.iter().find(|e| normalize(&e.name) == wanted)
    }

    /// Catalog keys outrank the generic keys already in `builder`.
    pub fn add_responses(&self, mut builder: ResponseTableBuilder) -> ResponseTableBuilder {
        for exchange in &self.exchanges {
            builder =
                builder.specific_entry([exchange.name.as_str()], [exchange.listing_message()]);
            for stock in &exchange.stocks {
                let keys = std::iter::once(&stock.name).chain(&stock.aliases).cloned();
                builder = builder.specific_entry(keys, [stock.price_message()]);
            }
        }
        builder
    }
}

// Labels the menu uses for navigation; a node with one of these names
// could never be selected.
fn check_label(label: &str, kind: &str) -> Result<String> {
    let name = normalize(label);
    if name.is_empty() {
        return Err(StockbotError::InvalidCatalog(format!(
            "{kind} name must not be blank"
        )));
    }
    if name == normalize(MENU) || name == normalize(GO_BACK) {
        return Err(StockbotError::InvalidCatalog(format!(
            "{kind} name {label:?} is reserved for menu navigation"
        )));
    }
    Ok(name)
}

fn validate(exchanges: &[Exchange]) -> Result<()> {
    if exchanges.is_empty() {
        return Err(StockbotError::InvalidCatalog(
            "catalog lists no exchanges".to_string(),
        ));
    }

    let mut exchange_names = HashSet::new();
    let mut stock_names = HashSet::new();
    for exchange in exchanges {
        let name = check_label(&exchange.name, "exchange")?;
        if !exchange_names.insert(name) {
            return Err(StockbotError::InvalidCatalog(format!(
                "duplicate exchange {:?}",
                exchange.name
            )));
        }

        for stock in &exchange.stocks {
            let name = check_label(&stock.name, "stock")?;
            // Names double as lookup keys, so they must be unique catalog-wide.
            if !stock_names.insert(name) {
                return Err(StockbotError::InvalidCatalog(format!(
                    "duplicate stock {:?}",
                    stock.name
                )));
            }
            if !stock.price.is_finite() {
                return Err(StockbotError::InvalidCatalog(format!(
                    "price of {} is not a number",
                    stock.name
                )));
            }
            if stock.aliases.iter().any(|alias| normalize(alias).is_empty()) {
                return Err(StockbotError::InvalidCatalog(format!(
                    "blank alias on {}",
                    stock.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ResponseEngine, ResponseTable};

    fn stock(name: &str, price: f64) -> Stock {
        Stock {
            name: name.to_string(),
            price,
            aliases: Vec::new(),
        }
    }

    fn exchange(name: &str, stocks: Vec<Stock>) -> Exchange {
        Exchange {
            name: name.to_string(),
            stocks,
        }
    }

    #[test]
    fn parses_camel_case_field_names() {
        let catalog = StockCatalog::from_json_str(
            r#"[{
                "stockExchange": "LSE",
                "topStocks": [
                    { "stockName": "HSBC", "price": 642.4 },
                    { "stockName": "Unilever", "price": 4097, "aliases": ["ULVR"] }
                ]
            }]"#,
            "test",
        )
        .unwrap();

        let lse = &catalog.exchanges()[0];
        assert_eq!(lse.name, "LSE");
        assert_eq!(lse.stocks[0], stock("HSBC", 642.4));
        assert_eq!(lse.stocks[1].aliases, vec!["ULVR"]);
        assert_eq!(lse.stocks[1].price, 4097.0);
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let result = StockCatalog::from_json_str(r#"[{ "stockExchange": "LSE" }]"#, "test");
        match result {
            Err(StockbotError::Json { origin, .. }) => assert_eq!(origin, "test"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_entries() {
        assert!(matches!(
            StockCatalog::new(vec![]),
            Err(StockbotError::InvalidCatalog(_))
        ));

        let dup_exchange = StockCatalog::new(vec![
            exchange("Nasdaq", vec![]),
            exchange("NASDAQ", vec![]),
        ]);
        assert!(matches!(dup_exchange, Err(StockbotError::InvalidCatalog(_))));

        let dup_stock = StockCatalog::new(vec![
            exchange("A", vec![stock("Shell", 1.0)]),
            exchange("B", vec![stock("shell", 2.0)]),
        ]);
        assert!(matches!(dup_stock, Err(StockbotError::InvalidCatalog(_))));
    }

    #[test]
    fn rejects_blank_names_and_bad_prices() {
        let blank = StockCatalog::new(vec![exchange(" ", vec![])]);
        assert!(matches!(blank, Err(StockbotError::InvalidCatalog(_))));

        let blank_stock = StockCatalog::new(vec![exchange("A", vec![stock("--", 1.0)])]);
        assert!(matches!(blank_stock, Err(StockbotError::InvalidCatalog(_))));

        let nan = StockCatalog::new(vec![exchange("A", vec![stock("X", f64::NAN)])]);
        assert!(matches!(nan, Err(StockbotError::InvalidCatalog(_))));

        let mut aliased = stock("X", 1.0);
        aliased.aliases.push("!".to_string());
        let blank_alias = StockCatalog::new(vec![exchange("A", vec![aliased])]);
        assert!(matches!(blank_alias, Err(StockbotError::InvalidCatalog(_))));
    }

    #[test]
    fn rejects_names_reserved_for_navigation() {
        let menu_exchange = StockCatalog::new(vec![exchange("MENU", vec![])]);
        match menu_exchange {
            Err(StockbotError::InvalidCatalog(msg)) => assert!(msg.contains("reserved")),
            other => panic!("expected reserved label error, got {other:?}"),
        }

        let go_back_stock =
            StockCatalog::new(vec![exchange("Nasdaq", vec![stock("Go  back!", 1.0)])]);
        assert!(matches!(go_back_stock, Err(StockbotError::InvalidCatalog(_))));

        let mut aliased = stock("Menu Foods", 1.0);
        aliased.aliases.push("menu".to_string());
        assert!(StockCatalog::new(vec![exchange("Nasdaq", vec![aliased])]).is_ok());
    }

    #[test]
    fn stock_names_beat_generic_price_keys() {
        let mut apple = stock("Apple Inc.", 189.84);
        apple.aliases.extend(["AAPL".to_string(), "Apple".to_string()]);
        let catalog = StockCatalog::new(vec![exchange("Nasdaq", vec![apple])]).unwrap();

        let builder = ResponseTable::builder()
            .entry(["price", "stock price"], ["I can't fetch live prices yet."]);
        let engine = ResponseEngine::new(catalog.add_responses(builder).build().unwrap());

        assert_eq!(engine.respond("price of AAPL"), "Stock price of Apple Inc. is 189.84");
        assert_eq!(
            engine.respond("Apple stock price"),
            "Stock price of Apple Inc. is 189.84"
        );
        assert_eq!(engine.respond("stock price"), "I can't fetch live prices yet.");
    }

    #[test]
    fn exchange_lookup_ignores_case() {
        let catalog = StockCatalog::new(vec![exchange("New York Stock Exchange", vec![])]).unwrap();
        assert!(catalog.exchange("new york stock exchange").is_some());
        assert!(catalog.exchange("Nasdaq").is_none());
    }

    #[test]
    fn price_message_matches_menu_wording() {
        assert_eq!(
            stock("Tesla Inc.", 183.01).price_message(),
            "Stock price of Tesla Inc. is 183.01"
        );
    }

    #[test]
    fn responses_cover_stocks_aliases_and_exchanges() {
        let mut apple = stock("Apple Inc.", 189.84);
        apple.aliases.push("AAPL".to_string());
        let catalog = StockCatalog::new(vec![
            exchange("Nasdaq", vec![apple, stock("Tesla Inc.", 183.01)]),
            exchange("Empty Exchange", vec![]),
        ])
        .unwrap();

        let table = catalog
            .add_responses(ResponseTable::builder())
            .build()
            .unwrap();
        let engine = ResponseEngine::new(table);

        assert_eq!(engine.respond("aapl"), "Stock price of Apple Inc. is 189.84");
        assert_eq!(
            engine.respond("What about AAPL?"),
            engine.respond("AAPL")
        );
        assert_eq!(
            engine.respond("apple inc"),
            "Stock price of Apple Inc. is 189.84"
        );
        assert_eq!(
            engine.respond("nasdaq"),
            "Nasdaq lists: Apple Inc., Tesla Inc."
        );
        assert_eq!(
            engine.respond("empty exchange"),
            "Empty Exchange has no stocks listed."
        );
    }

    #[test]
    fn embedded_catalog_merges_with_embedded_table() {
        let catalog = StockCatalog::embedded().unwrap();
        assert!(!catalog.exchanges().is_empty());

        let builder = ResponseTableBuilder::embedded().unwrap();
        let table = catalog.add_responses(builder).build().unwrap();
        let engine = ResponseEngine::new(table);
        assert_eq!(
            engine.respond("what about AAPL"),
            "Stock price of Apple Inc. is 189.84"
        );
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.json");
        std::fs::write(
            &path,
            r#"[{ "stockExchange": "TSE", "topStocks": [{ "stockName": "Toyota", "price": 3200 }] }]"#,
        )
        .unwrap();

        let catalog = StockCatalog::load(&path).unwrap();
        assert_eq!(catalog.exchanges()[0].stocks[0].name, "Toyota");

        let missing = StockCatalog::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(StockbotError::Io { .. })));
    }
}
