//! Formato del header `Date` (`EEE, dd MMM yyyy HH:mm:ss z` en GMT).

use chrono::{DateTime, Utc};

/// Formatea un instante como fecha HTTP en GMT
///
/// # Ejemplo
/// ```
/// use chrono::{TimeZone, Utc};
/// use static_server::http::date::http_date;
///
/// let instant = Utc.with_ymd_and_hms(2019, 3, 8, 14, 5, 9).unwrap();
/// assert_eq!(http_date(instant), "Fri, 08 Mar 2019 14:05:09 GMT");
/// ```
pub fn http_date(instant: DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Fecha HTTP del momento actual; se recalcula en cada respuesta
pub fn now() -> String {
    http_date(Utc::now())
}
