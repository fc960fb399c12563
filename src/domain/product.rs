use serde::{Deserialize, Serialize};

/// Sentinel monthly price for segments without a monthly plan
pub const MONTHLY_PRICE_NOT_APPLICABLE: &str = "N/A";

/// Contract-type segment of the shop catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Pay Monthly")]
    PayMonthly,
    #[serde(rename = "Pay As You Go")]
    PayAsYouGo,
}

impl ContractType {
    /// Segments in the order they are scraped
    pub const ALL: [ContractType; 2] = [ContractType::PayMonthly, ContractType::PayAsYouGo];

    /// Identifier used in the listing query string
    pub fn query_value(self) -> &'static str {
        match self {
            ContractType::PayMonthly => "paymonthly",
            ContractType::PayAsYouGo => "payasyougo",
        }
    }

    /// Human readable label written into the dataset
    pub fn label(self) -> &'static str {
        match self {
            ContractType::PayMonthly => "Pay Monthly",
            ContractType::PayAsYouGo => "Pay As You Go",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Product summary scraped from a listing tile
///
/// Field order is the column order of the published dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub brand: String,
    pub model: String,
    pub upfront_cost: String,
    pub monthly_price: String,
    /// Join key with the detail tables, kept exactly as built from the listing href
    pub link: String,
    pub rating: f64,
    pub reviews: String,
    pub contract_type: ContractType,
}

impl ProductSummary {
    /// Summary field names in dataset order
    pub const FIELDS: [&'static str; 8] = [
        "brand",
        "model",
        "upfront_cost",
        "monthly_price",
        "link",
        "rating",
        "reviews",
        "contract_type",
    ];

    /// Value of a summary field as a JSON cell
    pub fn field_value(&self, field: &str) -> Option<serde_json::Value> {
        use serde_json::Value;

        let value = match field {
            "brand" => Value::from(self.brand.as_str()),
            "model" => Value::from(self.model.as_str()),
            "upfront_cost" => Value::from(self.upfront_cost.as_str()),
            "monthly_price" => Value::from(self.monthly_price.as_str()),
            "link" => Value::from(self.link.as_str()),
            "rating" => serde_json::Number::from_f64(self.rating).map_or(Value::Null, Value::Number),
            "reviews" => Value::from(self.reviews.as_str()),
            "contract_type" => Value::from(self.contract_type.label()),
            _ => return None,
        };
        Some(value)
    }
}

/// Round a rating to two decimal places, exact halves to even
pub fn round_rating(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Format the review counter the way it is published
pub fn format_reviews(count: &str) -> String {
    format!("{count} reviews")
}

/// Summaries of one listing harvest plus the links in the same order
#[derive(Debug, Clone, Default)]
pub struct ListingHarvest {
    pub summaries: Vec<ProductSummary>,
    pub links: Vec<String>,
}

impl ListingHarvest {
    pub fn push(&mut self, summary: ProductSummary) {
        self.links.push(summary.link.clone());
        self.summaries.push(summary);
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
