//! Field extractors for the procurement portal
//!
//! Every field is the trimmed text (or attribute) of the first element its
//! selector matches inside the row; a missing cell yields an empty string.

use crate::browser::PageSnapshot;
use crate::extract::FieldExtractor;
use crate::model::{Lot, LotDetailRow, Notice};
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Reads notices from the rows of the portal's notice listing
#[derive(Debug, Clone)]
pub struct NoticeRowExtractor {
    rows: String,
}

impl NoticeRowExtractor {
    pub fn new(rows: &str) -> Result<Self, ExtractError> {
        selector(rows)?;
        Ok(Self {
            rows: rows.to_string(),
        })
    }
}

impl FieldExtractor for NoticeRowExtractor {
    type Record = Notice;

    fn extract(&self, page: &PageSnapshot) -> Result<Vec<Notice>, ExtractError> {
        let rows = selector(&self.rows)?;
        let anchor = selector("td.col-edital a")?;
        let start_date = selector("td:nth-of-type(3) span")?;
        let end_date = selector("td.hidden-xs:nth-of-type(4)")?;
        let lot_count = selector("td.hidden-xs:last-child")?;

        let base = Url::parse(&page.url).ok();
        let document = Html::parse_document(&page.html);

        let notices = document
            .select(&rows)
            .map(|row| {
                let link = attr_of(&row, &anchor, "href")
                    .map(|href| resolve(base.as_ref(), &href))
                    .unwrap_or_default();
                let code = text_of(&row, &anchor);
                let description = code.split(' ').last().unwrap_or_default().to_string();

                Notice {
                    link,
                    description,
                    code,
                    start_date: text_of(&row, &start_date),
                    end_date: text_of(&row, &end_date),
                    lots: leading_number(&text_of(&row, &lot_count)),
                    lots_details: Vec::new(),
                }
            })
            .collect();

        Ok(notices)
    }
}

/// Reads lots from one page of a notice's lot listing
#[derive(Debug, Clone)]
pub struct LotRowExtractor {
    rows: String,
}

impl LotRowExtractor {
    pub fn new(rows: &str) -> Result<Self, ExtractError> {
        selector(rows)?;
        Ok(Self {
            rows: rows.to_string(),
        })
    }
}

impl FieldExtractor for LotRowExtractor {
    type Record = Lot;

    fn extract(&self, page: &PageSnapshot) -> Result<Vec<Lot>, ExtractError> {
        let rows = selector(&self.rows)?;
        let lot = selector("td.text-left a")?;
        let min_price = selector("td.text-right div.valor-lote")?;
        let kind = selector("td:nth-of-type(3)")?;
        let status = selector("td:nth-of-type(4)")?;
        let errata = selector("td.text-center a span")?;
        let person = selector("icone-tipo-clientela img")?;

        let document = Html::parse_document(&page.html);

        let lots = document
            .select(&rows)
            .map(|row| Lot {
                lot: text_of(&row, &lot),
                min_price: text_of(&row, &min_price),
                kind: text_of(&row, &kind),
                status: text_of(&row, &status),
                person: attr_of(&row, &person, "title").unwrap_or_default(),
                errata_warnings: text_of(&row, &errata),
                link: None,
                lot_table: Vec::new(),
            })
            .collect();

        Ok(lots)
    }
}

/// Reads the item table of a lot detail page
#[derive(Debug, Clone)]
pub struct DetailRowExtractor {
    rows: String,
}

impl DetailRowExtractor {
    pub fn new(rows: &str) -> Result<Self, ExtractError> {
        selector(rows)?;
        Ok(Self {
            rows: rows.to_string(),
        })
    }
}

impl FieldExtractor for DetailRowExtractor {
    type Record = LotDetailRow;

    fn extract(&self, page: &PageSnapshot) -> Result<Vec<LotDetailRow>, ExtractError> {
        let rows = selector(&self.rows)?;
        let cells = [
            selector("td:nth-of-type(1)")?,
            selector("td:nth-of-type(2)")?,
            selector("td:nth-of-type(3)")?,
            selector("td:nth-of-type(4)")?,
        ];

        let document = Html::parse_document(&page.html);

        let details = document
            .select(&rows)
            .map(|row| {
                let [venue, quantity, unit, description] =
                    cells.each_ref().map(|cell| text_of(&row, cell));
                LotDetailRow {
                    venue,
                    quantity,
                    unit,
                    description,
                }
            })
            .collect();

        Ok(details)
    }
}

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// Trimmed text content of the first match of `selector` inside `row`
fn text_of(row: &ElementRef, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn attr_of(row: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    row.select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
}

/// Resolves a link against the page it was found on
fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

/// Parses the leading digits of `text`, 0 when there are none
fn leading_number(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
