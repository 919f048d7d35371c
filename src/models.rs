use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

#[derive(Serialize , Deserialize, Debug, Clone)]
pub struct Product {
    pub _id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug , Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Price,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// MongoDB sort direction: 1 ascending, -1 descending.
    pub fn sign(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }

    pub fn flipped(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

/// Query-string parameters of the list endpoint. A request without a
/// `direction` is a fresh query: any cursor tokens it carries are ignored.
#[derive(Debug , Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub filter: String,
    pub direction: Option<Direction>,
    #[serde(default = "default_page")]
    pub page: u32,
    pub first: Option<String>,
    pub last: Option<String>,
}

fn default_page() -> u32 {
    1
}

/// One page of the product list, with the cursor tokens a client echoes
/// back to request the adjacent page.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub first: Option<String>,
    pub last: Option<String>,
}
