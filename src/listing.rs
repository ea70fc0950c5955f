//! ListingFacts - one-pass feature extraction from a product-listing page.
//!
//! All relevant fields are pulled from the HTML once, including the raw
//! candidate strings for every price-probe tier; resolution and scoring then
//! work on plain values and never touch the document again. Static HTML
//! carries no layout, so document order stands in for on-screen visibility.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::normalize::collapse_whitespace;
use crate::record::{ProductRecord, MAX_BULLETS, MAX_REVIEWS};
use crate::resolve::{
    compose_price, json_ld_price, meta_price, script_price, variant_widget_price, PriceProbe,
};

/// Catalog id in the URL path: /dp/<id> or /gp/product/<id>
static ASIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(?:dp|gp/product)/([A-Z0-9]{10})").expect("Invalid catalog id regex")
});

static SHIPS_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Ships from\s*([^.]+)\.?").expect("Invalid ships-from regex"));

static SOLD_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Sold by\s*([^.]+)\.?").expect("Invalid sold-by regex"));

/// Currently-visible rendered price, scoped to the selected-variant region
/// first. Listing pages show several prices at once (subscription, list
/// price, deals); these are ordered most-specific first.
const RENDERED_PRICE_SELECTORS: &[&str] = &[
    "#apex_desktop .apexPriceToPay .a-offscreen",
    "#apex_desktop .priceToPay .a-offscreen",
    "#apex_offerDisplay_desktop .apexPriceToPay .a-offscreen",
    "#apex_offerDisplay_desktop .priceToPay .a-offscreen",
    "#apex_offerDisplay_desktop [data-a-color='price'] .a-offscreen",
    "#apex_offerDisplay_desktop .a-price .a-offscreen",
    "#corePriceDisplay_desktop_feature_div .priceToPay .a-offscreen",
    "#corePriceDisplay_desktop_feature_div .apexPriceToPay .a-offscreen",
    "#corePriceDisplay_desktop_feature_div [data-a-color='price'] .a-offscreen",
    "#corePriceDisplay_desktop_feature_div .a-price .a-offscreen",
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    "#priceblock_saleprice",
    "#corePriceDisplay_desktop_feature_div .a-price-range",
    ".a-price-range",
    ".a-price .a-offscreen",
];

const PRICE_WHOLE_SELECTORS: &[&str] = &[
    "#apex_desktop .a-price-whole",
    "#apex_offerDisplay_desktop .a-price-whole",
    "#corePriceDisplay_desktop_feature_div .a-price-whole",
    "#corePrice_feature_div .a-price-whole",
    ".a-price-whole",
];

const PRICE_FRACTION_SELECTORS: &[&str] = &[
    "#apex_desktop .a-price-fraction",
    "#apex_offerDisplay_desktop .a-price-fraction",
    "#corePriceDisplay_desktop_feature_div .a-price-fraction",
    "#corePrice_feature_div .a-price-fraction",
    ".a-price-fraction",
];

const PRICE_SYMBOL_SELECTORS: &[&str] = &[
    "#apex_desktop .a-price-symbol",
    "#apex_offerDisplay_desktop .a-price-symbol",
    "#corePriceDisplay_desktop_feature_div .a-price-symbol",
    "#corePrice_feature_div .a-price-symbol",
    ".a-price-symbol",
];

/// Variant-selector widget: rendered label or an embedded data blob
const VARIANT_WIDGET_SELECTORS: &[&str] = &[
    "#twister-plus-price-data",
    "#twister .a-price .a-offscreen",
    "#twister .priceToPay .a-offscreen",
    "#twister .a-color-price",
    "#twister .a-color-base",
];

/// Page-level metadata tags carrying a price, most specific first
const META_PRICE_SELECTORS: &[&str] = &[
    "meta[itemprop='price']",
    "meta[property='product:price:amount']",
    "meta[property='og:price:amount']",
    "meta[name='twitter:data1']",
    "meta[name='twitter:label1']",
    "meta[name='twitter:data2']",
];

const TITLE_SELECTORS: &[&str] = &[
    "#productTitle",
    "#title span",
    "h1#title span",
    "h1 span#productTitle",
    "h1.a-size-large",
    "span#productTitle",
];

const RATING_SELECTORS: &[&str] = &[
    "#acrPopover span.a-icon-alt",
    "#averageCustomerReviews .a-icon-alt",
    ".a-icon-star .a-icon-alt",
    ".a-icon-alt",
];

const REVIEW_COUNT_SELECTORS: &[&str] = &[
    "#acrCustomerReviewText",
    "[data-hook='total-review-count']",
];

/// Unified feature extraction from a product-listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingFacts {
    /// Source page URL
    pub url: String,
    /// Catalog id from the URL path, empty when absent
    pub asin: String,
    pub title: String,
    pub brand: String,
    /// "Color: X | Size: Y | Style: Z" for the selected variation
    pub selected_variant: String,
    pub rating: String,
    pub review_count_text: String,
    /// Breadcrumb trail joined with " > "
    pub category: String,
    pub bullets: Vec<String>,
    /// Demand-rank row text, empty when not found
    pub rank: String,
    pub ships_from: String,
    pub sold_by: String,
    pub reviews: Vec<String>,

    // === Price candidates, one field per probe tier ===
    rendered_price: String,
    price_symbol: String,
    price_whole: String,
    price_fraction: String,
    variant_widget_text: String,
    json_ld_docs: Vec<serde_json::Value>,
    meta_candidates: Vec<String>,
    inline_scripts: Vec<String>,
}

impl ListingFacts {
    /// Extract all features from a page's HTML
    pub fn from_html(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut facts = Self {
            url: url.to_string(),
            asin: ASIN_RE
                .captures(url)
                .map(|c| c[1].to_string())
                .unwrap_or_default(),
            ..Default::default()
        };

        facts.extract_title(&document);
        facts.extract_brand(&document);
        facts.extract_variant(&document);
        facts.extract_rating(&document);
        facts.extract_category(&document);
        facts.extract_bullets(&document);
        facts.extract_rank(&document);
        facts.extract_merchant(&document);
        facts.extract_reviews(&document);
        facts.extract_price_candidates(&document);
        facts
    }

    /// The ordered price-probe chain for this listing, highest priority first
    pub fn price_probes(&self) -> Vec<PriceProbe<'_>> {
        vec![
            PriceProbe::new("rendered", || non_empty(&self.rendered_price)),
            PriceProbe::new("composed", || {
                compose_price(
                    non_empty(&self.price_symbol).as_deref(),
                    non_empty(&self.price_whole).as_deref(),
                    non_empty(&self.price_fraction).as_deref(),
                )
            }),
            PriceProbe::new("variant-widget", || {
                variant_widget_price(&self.variant_widget_text)
            }),
            PriceProbe::new("json-ld", || {
                self.json_ld_docs.iter().find_map(json_ld_price)
            }),
            PriceProbe::new("meta", || meta_price(&self.meta_candidates)),
            PriceProbe::new("script-scan", || script_price(&self.inline_scripts)),
        ]
    }

    /// Build the immutable record for this inspection pass
    pub fn into_record(self, price: crate::normalize::NormalizedPrice) -> ProductRecord {
        ProductRecord {
            url: self.url,
            asin: self.asin,
            title: self.title,
            brand: self.brand,
            selected_variant: self.selected_variant,
            category: self.category,
            bullets: self.bullets,
            reviews: self.reviews,
            rating: self.rating,
            review_count_text: self.review_count_text,
            rank: self.rank,
            ships_from: self.ships_from,
            sold_by: self.sold_by,
            price,
        }
    }

    fn extract_title(&mut self, document: &Html) {
        self.title = pick_first(document, TITLE_SELECTORS);
    }

    fn extract_brand(&mut self, document: &Html) {
        let byline = pick_first(
            document,
            &["#bylineInfo", "#bylineInfo_feature_div #bylineInfo"],
        );
        let mut brand = byline;
        for prefix in ["Visit the ", "Brand: "] {
            if let Some(stripped) = strip_prefix_ci(&brand, prefix) {
                brand = stripped;
            }
        }
        if let Some(stripped) = strip_suffix_ci(&brand, " Store") {
            brand = stripped;
        }
        self.brand = brand.trim().to_string();
    }

    fn extract_variant(&mut self, document: &Html) {
        let mut bits = Vec::new();
        for (label, container) in [
            ("Color", "#variation_color_name"),
            ("Size", "#variation_size_name"),
            ("Style", "#variation_style_name"),
        ] {
            let selectors = [
                format!("{container} .selection"),
                format!("{container} .a-dropdown-prompt"),
            ];
            let selectors: Vec<&str> = selectors.iter().map(String::as_str).collect();
            let value = pick_first(document, &selectors);
            if !value.is_empty() {
                bits.push(format!("{label}: {value}"));
            }
        }

        self.selected_variant = if bits.is_empty() {
            pick_first(
                document,
                &["#centerCol #variation_values .selection", "#twister .selection"],
            )
        } else {
            bits.join(" | ")
        };
    }

    fn extract_rating(&mut self, document: &Html) {
        self.rating = pick_first(document, RATING_SELECTORS);
        self.review_count_text = pick_first(document, REVIEW_COUNT_SELECTORS);
    }

    fn extract_category(&mut self, document: &Html) {
        let crumbs = select_texts(
            document,
            "#wayfinding-breadcrumbs_container ul.a-unordered-list a, \
             #wayfinding-breadcrumbs_feature_div ul.a-unordered-list a",
        );
        self.category = crumbs.join(" > ");
    }

    fn extract_bullets(&mut self, document: &Html) {
        self.bullets = select_texts(document, "#feature-bullets ul li span.a-list-item")
            .into_iter()
            .filter(|s| s.len() > 3)
            .take(MAX_BULLETS)
            .collect();
    }

    /// Demand rank lives either in a spec table row or a detail bullet
    fn extract_rank(&mut self, document: &Html) {
        if let Ok(row_selector) = Selector::parse("tr") {
            for row in document.select(&row_selector) {
                let has_rank_header = select_within(&row, "th")
                    .iter()
                    .any(|t| t.contains("Best Sellers Rank") || t.contains("Bestsellers Rank"));
                if has_rank_header {
                    if let Some(value) = select_within(&row, "td").into_iter().next() {
                        self.rank = value;
                        return;
                    }
                }
            }
        }

        let items = select_texts(
            document,
            "#detailBullets_feature_div li, #detailBulletsWrapper_feature_div li",
        );
        if let Some(item) = items.into_iter().find(|t| t.contains("Best Sellers Rank")) {
            self.rank = item;
        }
    }

    fn extract_merchant(&mut self, document: &Html) {
        let merchant_info = pick_first(document, &["#merchant-info"]);
        if !merchant_info.is_empty() {
            self.ships_from = SHIPS_FROM_RE
                .captures(&merchant_info)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();
            self.sold_by = SOLD_BY_RE
                .captures(&merchant_info)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();
        }

        // Buybox table fills in whatever the merchant line did not
        if let Ok(row_selector) = Selector::parse("#tabular-buybox tr") {
            for row in document.select(&row_selector) {
                let cells = select_within(&row, "td");
                if cells.len() < 2 {
                    continue;
                }
                let label = cells[0].to_lowercase();
                let value = cells[1].clone();
                if label.contains("ships from") && self.ships_from.is_empty() {
                    self.ships_from = value;
                } else if label.contains("sold by") && self.sold_by.is_empty() {
                    self.sold_by = value;
                }
            }
        }
    }

    fn extract_reviews(&mut self, document: &Html) {
        let mut reviews = Vec::new();
        if let Ok(review_selector) = Selector::parse("[data-hook='review']") {
            for review in document.select(&review_selector).take(MAX_REVIEWS) {
                let body = select_within(&review, "[data-hook='review-body']")
                    .into_iter()
                    .next()
                    .or_else(|| {
                        select_within(&review, ".review-text-content span")
                            .into_iter()
                            .next()
                    });
                if let Some(body) = body {
                    reviews.push(body);
                }
            }
        }
        if reviews.is_empty() {
            reviews = select_texts(
                document,
                ".review-text-content span, .a-expander-content span",
            )
            .into_iter()
            .take(MAX_REVIEWS)
            .collect();
        }
        self.reviews = reviews;
    }

    fn extract_price_candidates(&mut self, document: &Html) {
        self.rendered_price = pick_first(document, RENDERED_PRICE_SELECTORS);
        self.price_symbol = pick_first(document, PRICE_SYMBOL_SELECTORS);
        self.price_whole = pick_first(document, PRICE_WHOLE_SELECTORS);
        self.price_fraction = pick_first(document, PRICE_FRACTION_SELECTORS);
        self.variant_widget_text = pick_first(document, VARIANT_WIDGET_SELECTORS);

        if let Ok(selector) = Selector::parse("script[type='application/ld+json']") {
            for element in document.select(&selector) {
                let text: String = element.text().collect();
                if let Ok(json) = serde_json::from_str(&text) {
                    self.json_ld_docs.push(json);
                }
            }
        }

        for css in META_PRICE_SELECTORS {
            if let Ok(selector) = Selector::parse(css) {
                if let Some(element) = document.select(&selector).next() {
                    if let Some(content) = element.value().attr("content") {
                        let content = content.trim();
                        if !content.is_empty() {
                            self.meta_candidates.push(content.to_string());
                        }
                    }
                }
            }
        }

        if let Ok(selector) = Selector::parse("script") {
            for element in document.select(&selector) {
                if element.value().attr("type") == Some("application/ld+json") {
                    continue;
                }
                let text: String = element.text().collect();
                if !text.is_empty() {
                    self.inline_scripts.push(text);
                }
            }
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First non-empty text across an ordered selector list
fn pick_first(document: &Html, selectors: &[&str]) -> String {
    for css in selectors {
        if let Ok(selector) = Selector::parse(css) {
            for element in document.select(&selector) {
                let text = element_text(&element);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }
    String::new()
}

/// All non-empty texts matching one selector group
fn select_texts(document: &Html, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Non-empty texts matching a selector inside one element
fn select_within(root: &ElementRef, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    root.select(&selector)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect()
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn strip_prefix_ci(s: &str, prefix: &str) -> Option<String> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(s[prefix.len()..].to_string())
    } else {
        None
    }
}

fn strip_suffix_ci(s: &str, suffix: &str) -> Option<String> {
    let cut = s.len().checked_sub(suffix.len())?;
    let tail = s.get(cut..)?;
    if tail.eq_ignore_ascii_case(suffix) {
        Some(s[..cut].to_string())
    } else {
        None
    }
}
