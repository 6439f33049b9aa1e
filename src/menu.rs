use serde::{Deserialize, Serialize};

use crate::catalog::{Exchange, Stock, StockCatalog};
use crate::engine::normalize;

pub const WELCOME: &str = "Hello! Welcome to LSEG. I am here to help you.";
pub const UNAVAILABLE: &str = "Sorry, this option is not available. Please try again.";
pub const FAILURE: &str = "Sorry, we encountered an issue. Please try again later.";

pub const MENU: &str = "Menu";
pub const GO_BACK: &str = "Go back";

const SELECT_EXCHANGE: &str = "Please select a stock exchange:";
const EXCHANGE_DEFAULTS: &str =
    "If you do not wish to proceed, then please select one of the following:";
const STOCK_DEFAULTS: &str = "Please choose one of the following:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Text(String),
    Options(Vec<String>),
}

impl Segment {
    fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuReply {
    pub reply: Vec<Segment>,
    /// Labels leading to the node the reply describes; empty at the root.
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Position<'a> {
    Root,
    Exchange(&'a Exchange),
    Stock(&'a Exchange, &'a Stock),
}

impl Position<'_> {
    fn path(&self) -> Vec<String> {
        match self {
            Position::Root => Vec::new(),
            Position::Exchange(exchange) => vec![exchange.name.clone()],
            Position::Stock(exchange, stock) => vec![exchange.name.clone(), stock.name.clone()],
        }
    }

    fn parent(&self) -> Self {
        match *self {
            Position::Root | Position::Exchange(_) => Position::Root,
            Position::Stock(exchange, _) => Position::Exchange(exchange),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuTree {
    catalog: StockCatalog,
}

impl MenuTree {
    pub fn new(catalog: StockCatalog) -> Self {
        Self { catalog }
    }

    pub fn start(&self) -> MenuReply {
        let mut reply = vec![Segment::text(WELCOME)];
        reply.extend(self.prompt(Position::Root));
        MenuReply {
            reply,
            path: Vec::new(),
        }
    }

    pub fn select(&self, path: &[String], selection: &str) -> MenuReply {
        let Some(current) = self.resolve(path) else {
            tracing::warn!(?path, "menu path does not resolve");
            let mut reply = vec![Segment::text(FAILURE)];
            reply.extend(self.prompt(Position::Root));
            return MenuReply {
                reply,
                path: Vec::new(),
            };
        };

        match self.next(current, selection) {
            Some(next) => MenuReply {
                reply: self.prompt(next),
                path: next.path(),
            },
            None => {
                tracing::debug!(selection, "menu option not available");
                let mut reply = vec![Segment::text(UNAVAILABLE)];
                reply.extend(self.prompt(current));
                MenuReply {
                    reply,
                    path: current.path(),
                }
            }
        }
    }

    fn resolve(&self, path: &[String]) -> Option<Position<'_>> {
        match path {
            [] => Some(Position::Root),
            [exchange] => self.catalog.exchange(exchange).map(Position::Exchange),
            [exchange, stock] => {
                let exchange = self.catalog.exchange(exchange)?;
                find_stock(exchange, stock).map(|stock| Position::Stock(exchange, stock))
            }
            _ => None,
        }
    }

    fn next<'a>(&'a self, current: Position<'a>, selection: &str) -> Option<Position<'a>> {
        let wanted = normalize(selection);
        if wanted.is_empty() {
            return None;
        }

        let at_root = matches!(current, Position::Root);
        if !at_root && wanted == normalize(MENU) {
            return Some(Position::Root);
        }
        if !at_root && wanted == normalize(GO_BACK) {
            return Some(current.parent());
        }

        match current {
            Position::Root => self.catalog.exchange(&wanted).map(Position::Exchange),
            Position::Exchange(exchange) => {
                find_stock(exchange, &wanted).map(|stock| Position::Stock(exchange, stock))
            }
            Position::Stock(..) => None,
        }
    }

    fn prompt(&self, position: Position<'_>) -> Vec<Segment> {
        let defaults = || Segment::Options(vec![MENU.to_string(), GO_BACK.to_string()]);

        match position {
            Position::Root => vec![
                Segment::text(SELECT_EXCHANGE),
                Segment::Options(
                    self.catalog
                        .exchanges()
                        .iter()
                        .map(|e| e.name.clone())
                        .collect(),
                ),
            ],
            Position::Exchange(exchange) => {
                let mut reply = vec![Segment::text(format!(
                    "You selected {}. Please select a stock:",
                    exchange.name
                ))];
                if !exchange.stocks.is_empty() {
                    reply.push(Segment::Options(
                        exchange.stocks.iter().map(|s| s.name.clone()).collect(),
                    ));
                }
                reply.push(Segment::text(EXCHANGE_DEFAULTS));
                reply.push(defaults());
                reply
            }
            Position::Stock(_, stock) => vec![
                Segment::text(stock.price_message()),
                Segment::text(STOCK_DEFAULTS),
                defaults(),
            ],
        }
    }
}

fn find_stock<'a>(exchange: &'a Exchange, name: &str) -> Option<&'a Stock> {
    let wanted = normalize(name);
    exchange.stocks.iter().find(|s| normalize(&s.name) == wanted)
}
