use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub(crate) fn now_timestamp() -> Result<String, AppError> {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Start and end of a schedule beginning now and lasting `weeks` weeks.
pub(crate) fn schedule_window(weeks: u32) -> Result<(String, String), AppError> {
    let start = OffsetDateTime::now_utc();
    let end = start + Duration::weeks(i64::from(weeks));
    Ok((format_timestamp(start)?, format_timestamp(end)?))
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, AppError> {
    value
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
