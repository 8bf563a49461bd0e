//! Derivation of lot detail locators

const LOT_PREFIX: &str = "Lote ";

/// Extracts the numeric part of a lot identifier
///
/// The listing shows identifiers such as `"Lote 12"`; the detail page is
/// addressed by `"12"`. Returns `None` when nothing is left once the prefix
/// is removed.
pub fn lot_number(lot_id: &str) -> Option<&str> {
    let trimmed = lot_id.trim();
    let number = match trimmed.strip_prefix(LOT_PREFIX.trim_end()) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => trimmed,
    };

    if number.is_empty() {
        None
    } else {
        Some(number)
    }
}

/// Builds the detail page locator of a lot: `<notice link>/lote/<number>`
///
/// Returns `None` when the notice link is blank or the lot identifier has no
/// number, in which case the lot has no detail page to visit.
pub fn lot_detail_url(notice_link: &str, lot_id: &str) -> Option<String> {
    let base = notice_link.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }

    lot_number(lot_id).map(|number| format!("{}/lote/{}", base, number))
}
