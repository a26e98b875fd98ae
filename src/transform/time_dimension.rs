use crate::records::FieldError;
use crate::warehouse::TimeRow;
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Expands an epoch-milliseconds timestamp into the calendar attributes of
/// the time dimension.
///
/// The instant is read as UTC. `week` is the ISO week number and `weekday`
/// counts from Monday = 0.
pub fn derive_time_row(ts_millis: i64) -> Result<TimeRow, FieldError> {
    if ts_millis < 0 {
        return Err(FieldError::InvalidTimestamp(ts_millis));
    }
    let start_time: DateTime<Utc> = DateTime::from_timestamp_millis(ts_millis)
        .ok_or(FieldError::InvalidTimestamp(ts_millis))?;

    Ok(TimeRow {
        hour: start_time.hour(),
        day: start_time.day(),
        week: start_time.iso_week().week(),
        month: start_time.month(),
        year: start_time.year(),
        weekday: start_time.weekday().num_days_from_monday(),
        start_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_timestamp() {
        let row = derive_time_row(1541990258796).unwrap();
        assert_eq!(row.year, 2018);
        assert_eq!(row.month, 11);
        assert_eq!(row.day, 12);
        assert_eq!(row.hour, 2);
        assert_eq!(row.week, 46);
        // 2018-11-12 was a Monday.
        assert_eq!(row.weekday, 0);
        assert_eq!(row.start_time.timestamp_millis(), 1541990258796);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let first = derive_time_row(1542846220796).unwrap();
        let second = derive_time_row(1542846220796).unwrap();
        assert_eq!(first, second);
        // Thursday 2018-11-22.
        assert_eq!(first.weekday, 3);
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // 2018-12-31 is a Monday in ISO week 1 of 2019.
        let row = derive_time_row(1546214400000).unwrap();
        assert_eq!((row.year, row.month, row.day), (2018, 12, 31));
        assert_eq!(row.week, 1);
        assert_eq!(row.weekday, 0);
    }

    #[test]
    fn test_epoch_is_accepted() {
        let row = derive_time_row(0).unwrap();
        assert_eq!((row.year, row.month, row.day, row.hour), (1970, 1, 1, 0));
        assert_eq!(row.weekday, 3);
    }

    #[test]
    fn test_negative_timestamp_is_rejected() {
        assert_eq!(
            derive_time_row(-1),
            Err(FieldError::InvalidTimestamp(-1))
        );
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        assert_eq!(
            derive_time_row(i64::MAX),
            Err(FieldError::InvalidTimestamp(i64::MAX))
        );
    }
}
