use actix_web::http::header::{HeaderMap, HeaderName};
use std::str::FromStr;

/// Read and parse a header whose name comes from configuration.
pub fn get_header<T>(headers: &HeaderMap, header_name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
{
    let name = HeaderName::from_bytes(header_name.as_bytes())
        .map_err(|_| format!("header name {header_name} is not valid"))?;

    let Some(header_value) = headers.get(name) else {
        return Ok(None);
    };

    header_value
        .to_str()
        .map_err(|_| format!("header {header_name} can't be converted to string"))?
        .parse::<T>()
        .map_err(|_| format!("header {header_name} has wrong type"))
        .map(Some)
}
