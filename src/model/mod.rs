//! Data model for harvested notices
//!
//! A [`Notice`] exclusively owns its [`Lot`]s and a lot exclusively owns its
//! [`LotDetailRow`]s. Children are attached by value: `with_lots` and
//! `with_rows` consume the parent and return a new one, so a record is never
//! mutated in place once built.

mod locator;

pub use locator::{lot_detail_url, lot_number};

use serde::{Deserialize, Serialize};

/// Top-level procurement record, one row of the notice listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Locator of this notice's paginated lot listing
    pub link: String,

    /// Notice code as shown in the listing (e.g. "Edital 0800100/000003/2024")
    pub code: String,

    /// Last token of the code
    pub description: String,

    pub start_date: String,

    pub end_date: String,

    /// Number of lots declared by the listing row
    pub lots: u32,

    /// Lots gathered from the lot listing, in listing order
    #[serde(default)]
    pub lots_details: Vec<Lot>,
}

impl Notice {
    /// Returns this notice with `lots` attached as its children
    pub fn with_lots(self, lots: Vec<Lot>) -> Self {
        Self {
            lots_details: lots,
            ..self
        }
    }
}

/// A sellable unit within a notice, one row of a lot listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Lot identifier as shown in the listing (e.g. "Lote 12")
    pub lot: String,

    pub min_price: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub status: String,

    /// Kind of buyer allowed to bid (individual or company)
    pub person: String,

    pub errata_warnings: String,

    /// Detail page locator, absent when the identifier carries no number
    pub link: Option<String>,

    /// Item rows of the lot's detail table
    #[serde(default)]
    pub lot_table: Vec<LotDetailRow>,
}

impl Lot {
    /// Returns this lot with its detail locator derived from `notice_link`
    pub fn with_locator(self, notice_link: &str) -> Self {
        let link = lot_detail_url(notice_link, &self.lot);
        Self { link, ..self }
    }

    /// Returns this lot with `rows` attached as its detail table
    pub fn with_rows(self, rows: Vec<LotDetailRow>) -> Self {
        Self {
            lot_table: rows,
            ..self
        }
    }
}

/// One line item of a lot's detail table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDetailRow {
    pub venue: String,
    pub quantity: String,
    pub unit: String,
    pub description: String,
}
