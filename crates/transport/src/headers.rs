//! Header parsing shared by every transport implementation.

use http::HeaderMap;
use http::header::{CONTENT_LENGTH, HeaderValue, LAST_MODIFIED};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc2822;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// IMF-fixdate, the preferred HTTP date format: `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT");

pub(crate) fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(CONTENT_LENGTH)?.to_str().ok()?.trim().parse().ok()
}

pub(crate) fn last_modified(headers: &HeaderMap) -> Option<OffsetDateTime> {
    let value = headers.get(LAST_MODIFIED)?.to_str().ok()?.trim();
    match PrimitiveDateTime::parse(value, HTTP_DATE) {
        Ok(datetime) => Some(datetime.assume_utc()),
        // Older servers send numeric offsets or obsolete zone names.
        Err(_) => OffsetDateTime::parse(value, &Rfc2822).ok(),
    }
}

/// Render a timestamp as an IMF-fixdate header value.
pub(crate) fn http_date(datetime: OffsetDateTime) -> Option<HeaderValue> {
    let utc = datetime.to_offset(time::UtcOffset::UTC);
    let formatted = PrimitiveDateTime::new(utc.date(), utc.time()).format(HTTP_DATE).ok()?;
    HeaderValue::from_str(&formatted).ok()
}
