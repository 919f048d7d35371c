use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use mongodb::bson::Bson;
use serde::{Serialize, Deserialize};

use crate::models::{Direction, ListParams, Product, ProductPage, SortField};
use crate::query::{QueryPlan, PAGE_SIZE};

#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("invalid cursor encoding")]
    Encoding(#[from] base64::DecodeError),
    #[error("invalid cursor payload")]
    Payload(#[from] serde_json::Error),
}

/// Snapshot of a page-boundary document. Carries both sortable fields so a
/// token stays usable no matter which sort the page was loaded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorDoc {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl CursorDoc {
    pub fn from_product(product: &Product) -> Self {
        CursorDoc {
            id: product._id.clone(),
            name: product.name.clone(),
            price: product.price,
        }
    }

    /// Opaque token form, safe to round-trip through a URL.
    pub fn encode(&self) -> String {
        let payload = serde_json::to_vec(self).expect("cursor serializes");
        URL_SAFE_NO_PAD.encode(payload)
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let payload = URL_SAFE_NO_PAD.decode(token)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// Value of this boundary document under the given sort field.
    pub fn sort_key(&self, field: SortField) -> Bson {
        match field {
            SortField::Name => Bson::String(self.name.clone()),
            SortField::Price => Bson::Double(self.price),
        }
    }
}

/// Cursor state for one list request: the boundary documents of the page the
/// client is on, and that page's number.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    pub first: Option<CursorDoc>,
    pub last: Option<CursorDoc>,
    pub page: u32,
}

impl PageCursor {
    /// State of a query that starts from the beginning: no anchors, page 1.
    pub fn fresh() -> Self {
        PageCursor { first: None, last: None, page: 1 }
    }

    /// Rebuilds cursor state from request parameters. Anything that is not an
    /// anchored `next`/`prev` continuation collapses to `fresh()`, which is
    /// what resets pagination whenever the sort or filter changes: the client
    /// drops `direction` on such changes and the stale tokens are discarded
    /// here even if it forgot to.
    pub fn from_params(params: &ListParams) -> Result<Self, CursorError> {
        let anchored = match params.direction {
            Some(Direction::Next) => params.last.is_some(),
            Some(Direction::Prev) => params.first.is_some(),
            None => false,
        };
        if !anchored {
            return Ok(PageCursor::fresh());
        }

        let first = match &params.first {
            Some(token) => Some(CursorDoc::decode(token)?),
            None => None,
        };
        let last = match &params.last {
            Some(token) => Some(CursorDoc::decode(token)?),
            None => None,
        };
        Ok(PageCursor { first, last, page: params.page.max(1) })
    }

    /// Number of the page the request lands on. Unanchored directions fall
    /// back to page 1, matching the fresh query they degrade to.
    pub fn next_page_number(&self, direction: Option<Direction>) -> u32 {
        match direction {
            Some(Direction::Next) if self.last.is_some() => self.page + 1,
            Some(Direction::Prev) if self.first.is_some() => {
                self.page.saturating_sub(1).max(1)
            }
            _ => 1,
        }
    }
}

/// Finalizes the rows of one fetch into the list response. Anchored `prev`
/// fetches ran under the flipped sort and are restored to display order; they
/// always have a next page (the one the client just left). Forward fetches
/// carry a look-ahead row: its presence, not the page being full, is what
/// enables "next".
pub fn assemble_page(mut rows: Vec<Product>, plan: &QueryPlan, page: u32) -> ProductPage {
    if plan.reversed {
        rows.reverse();
        return page_of(rows, page, true);
    }
    let has_next = rows.len() > PAGE_SIZE;
    if has_next {
        rows.truncate(PAGE_SIZE);
    }
    page_of(rows, page, has_next)
}

/// Assembles the list response: boundary tokens are cut from the returned
/// rows when there are any, cleared when the page is empty.
pub fn page_of(items: Vec<Product>, page: u32, has_next: bool) -> ProductPage {
    let first = items.first().map(|p| CursorDoc::from_product(p).encode());
    let last = items.last().map(|p| CursorDoc::from_product(p).encode());
    ProductPage {
        page,
        has_prev: page > 1,
        has_next,
        first,
        last,
        items,
    }
}
