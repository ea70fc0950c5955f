//! Price resolution over an ordered probe chain.
//!
//! A listing page can render several prices at once (subscription vs one-time,
//! list price vs deal price), so candidate sources are consulted strictly in
//! priority order and the first non-empty result wins. Directly-rendered,
//! currently-visible values rank above structured metadata because only the
//! selected variant's visible value reflects what the shopper actually sees.
//! A probe that misses or blows up is a miss, never a failure of the chain.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::normalize::{normalize_price, NormalizedPrice};

/// Variant-widget blobs shorter than this are plain labels, returned as-is
const VARIANT_BLOB_LABEL_MAX: usize = 200;

/// Variant-widget blobs larger than this are not scanned at all
const VARIANT_BLOB_SCAN_MAX: usize = 64 * 1024;

/// Inline scripts shorter than this are boilerplate and never scanned
const SCRIPT_SCAN_MIN: usize = 500;

static BLOB_PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"price"\s*:\s*"?\$?([0-9,]+(\.[0-9]+)?)"?"#)
        .expect("Invalid blob price regex")
});

static BLOB_PRICE_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"priceAmount"\s*:\s*([0-9]+(\.[0-9]+)?)"#)
        .expect("Invalid blob priceAmount regex")
});

static SCRIPT_DISPLAY_PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"displayPrice"\s*:\s*"\$?([0-9,]+(\.[0-9]+)?)""#)
        .expect("Invalid script displayPrice regex")
});

/// A named candidate source for one field. Earlier probes outrank later ones.
pub struct PriceProbe<'a> {
    pub name: &'static str,
    fetch: Box<dyn Fn() -> Option<String> + 'a>,
}

impl<'a> PriceProbe<'a> {
    pub fn new(name: &'static str, fetch: impl Fn() -> Option<String> + 'a) -> Self {
        Self {
            name,
            fetch: Box::new(fetch),
        }
    }

    fn run(&self) -> Option<String> {
        let raw = (self.fetch)()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Consult probes in priority order and normalize the first usable result.
///
/// Returns the not-found sentinel when every probe misses.
pub fn resolve_price(probes: &[PriceProbe]) -> NormalizedPrice {
    for probe in probes {
        if let Some(raw) = probe.run() {
            return normalize_price(&raw);
        }
    }
    NormalizedPrice::not_found()
}

/// Like [`resolve_price`], also reporting which probe won
pub fn resolve_price_traced(probes: &[PriceProbe<'_>]) -> (NormalizedPrice, Option<&'static str>) {
    for probe in probes {
        if let Some(raw) = probe.run() {
            return (normalize_price(&raw), Some(probe.name));
        }
    }
    (NormalizedPrice::not_found(), None)
}

// ========== Tier helpers ==========
//
// These build the raw candidate string for the probe tiers that need more
// than a single rendered text node.

/// Compose a price from separately rendered symbol, whole and fraction parts
pub fn compose_price(symbol: Option<&str>, whole: Option<&str>, fraction: Option<&str>) -> Option<String> {
    let whole = whole.map(str::trim).filter(|s| !s.is_empty())?;
    let symbol = symbol.map(str::trim).unwrap_or("");
    match fraction.map(str::trim).filter(|s| !s.is_empty()) {
        Some(frac) => Some(format!("{symbol}{whole}.{frac}")),
        None => Some(format!("{symbol}{whole}")),
    }
}

/// Price from a variant-selector widget.
///
/// Short texts are plain rendered labels and pass through unchanged. Larger
/// texts are embedded data blobs: scan them for a price key, but only up to a
/// size where a regex pass is still cheap.
pub fn variant_widget_price(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() <= VARIANT_BLOB_LABEL_MAX {
        return Some(trimmed.to_string());
    }
    if trimmed.len() > VARIANT_BLOB_SCAN_MAX {
        return None;
    }
    if let Some(caps) = BLOB_PRICE_RE.captures(trimmed) {
        return Some(format!("${}", &caps[1]));
    }
    if let Some(caps) = BLOB_PRICE_AMOUNT_RE.captures(trimmed) {
        return Some(format!("${}", &caps[1]));
    }
    None
}

/// Price from parsed linked-data metadata.
///
/// Walks top-level arrays, `@graph` containers and offer arrays; accepts
/// `offers.price`, `offers.priceSpecification.price`, a low/high range pair,
/// or a direct `price` on the node. A candidate is only accepted if it
/// actually parses to a number.
pub fn json_ld_price(doc: &Value) -> Option<String> {
    let nodes: Vec<&Value> = match doc {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    for node in nodes {
        let candidates: Vec<&Value> = match node.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().collect(),
            None => vec![node],
        };

        for obj in candidates {
            let offers: Vec<&Value> = match obj.get("offers") {
                Some(Value::Array(items)) => items.iter().collect(),
                Some(single) => vec![single],
                None => Vec::new(),
            };

            for offer in &offers {
                let currency = offer
                    .get("priceCurrency")
                    .and_then(Value::as_str)
                    .or_else(|| obj.get("priceCurrency").and_then(Value::as_str))
                    .unwrap_or("");

                if let Some(price) = offer.get("price").and_then(value_to_text) {
                    if normalize_price(&price).numeric.is_some() {
                        return Some(with_currency(currency, &price));
                    }
                }

                if let Some(price) = offer
                    .get("priceSpecification")
                    .and_then(|spec| spec.get("price"))
                    .and_then(value_to_text)
                {
                    if normalize_price(&price).numeric.is_some() {
                        return Some(with_currency(currency, &price));
                    }
                }

                if let (Some(low), Some(high)) = (
                    offer.get("lowPrice").and_then(value_to_text),
                    offer.get("highPrice").and_then(value_to_text),
                ) {
                    if low.parse::<f64>().is_ok() && high.parse::<f64>().is_ok() {
                        return Some(with_currency(currency, &format!("{low} - {high}")));
                    }
                }
            }

            if let Some(price) = obj.get("price").and_then(value_to_text) {
                if normalize_price(&price).numeric.is_some() {
                    return Some(price);
                }
            }
        }
    }
    None
}

/// First meta-tag candidate that parses to a number, else the first candidate
pub fn meta_price(candidates: &[String]) -> Option<String> {
    let non_empty: Vec<&String> = candidates.iter().filter(|c| !c.trim().is_empty()).collect();
    non_empty
        .iter()
        .find(|c| normalize_price(c).numeric.is_some())
        .or_else(|| non_empty.first())
        .map(|c| c.to_string())
}

/// Last-resort scan of large inline script payloads for known price keys.
///
/// Tiny scripts are skipped; a short boilerplate snippet matching a price key
/// is far more likely to be a false positive than a real offer payload.
pub fn script_price(scripts: &[String]) -> Option<String> {
    for script in scripts {
        if script.len() < SCRIPT_SCAN_MIN {
            continue;
        }
        for re in [&*BLOB_PRICE_AMOUNT_RE, &*SCRIPT_DISPLAY_PRICE_RE] {
            if let Some(caps) = re.captures(script) {
                let num = caps[1].replace(',', "");
                if num.parse::<f64>().is_ok() {
                    return Some(format!("${num}"));
                }
            }
        }
    }
    None
}

fn with_currency(currency: &str, price: &str) -> String {
    if currency.is_empty() {
        price.to_string()
    } else {
        format!("{currency} {price}")
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
