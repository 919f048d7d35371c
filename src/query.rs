use mongodb::bson::{doc, Document};

use crate::models::{Direction, ListParams, SortField, SortOrder};
use crate::pagination::{CursorDoc, PageCursor};

pub const PAGE_SIZE: usize = 5;

/// Maximal-order character appended to a filter prefix, closing the
/// inclusive range that matches every name starting with the prefix.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// Everything the list handler needs to run one bounded `find`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filter: Document,
    pub sort: Document,
    pub limit: i64,
    /// Set on anchored `prev` plans: the fetch runs under the flipped sort,
    /// so rows arrive in reverse display order.
    pub reversed: bool,
}

/// Translates the list parameters and cursor state into a query plan for the
/// products collection.
pub struct ProductQueryBuilder<'a> {
    params: &'a ListParams,
    cursor: &'a PageCursor,
}

impl<'a> ProductQueryBuilder<'a> {
    pub fn new(params: &'a ListParams, cursor: &'a PageCursor) -> Self {
        ProductQueryBuilder { params, cursor }
    }

    pub fn build(&self) -> QueryPlan {
        let field = self.params.sort_by;
        let mut clauses: Vec<Document> = Vec::new();

        let prefix = self.params.filter.trim();
        if !prefix.is_empty() {
            let upper = format!("{}{}", prefix, PREFIX_SENTINEL);
            clauses.push(doc! { "name": { "$gte": prefix, "$lte": upper } });
        }

        let mut order = self.params.order;
        let mut reversed = false;
        let mut limit = (PAGE_SIZE + 1) as i64;

        match self.params.direction {
            // Continue strictly after the last document of the current page.
            Some(Direction::Next) => {
                if let Some(last) = &self.cursor.last {
                    clauses.push(keyset_after(field, order, last));
                }
            }
            // Walk backwards: anchor strictly after the first document of the
            // current page under the flipped sort, and let the caller restore
            // display order. Fetches exactly one page, no look-ahead row.
            Some(Direction::Prev) => {
                if let Some(first) = &self.cursor.first {
                    order = order.flipped();
                    reversed = true;
                    limit = PAGE_SIZE as i64;
                    clauses.push(keyset_after(field, order, first));
                }
            }
            None => {}
        }

        let filter = if clauses.is_empty() {
            Document::new()
        } else if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            doc! { "$and": clauses }
        };

        let key = field.as_str();
        let sign = order.sign();
        let sort = doc! { key: sign, "_id": sign };

        QueryPlan { filter, sort, limit, reversed }
    }
}

/// Keyset condition placing a document strictly after `boundary` under the
/// given order, with `_id` breaking ties between equal sort keys.
fn keyset_after(field: SortField, order: SortOrder, boundary: &CursorDoc) -> Document {
    let key = field.as_str();
    let value = boundary.sort_key(field);
    let cmp = match order {
        SortOrder::Asc => "$gt",
        SortOrder::Desc => "$lt",
    };
    doc! {
        "$or": [
            { key: { cmp: value.clone() } },
            { key: value, "_id": { cmp: boundary.id.clone() } },
        ]
    }
}
