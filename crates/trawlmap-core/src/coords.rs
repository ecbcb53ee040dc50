use trawlmap_tables::DmsCoordinate;

const MINUTES_PER_DEGREE: f64 = 60.0;
const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Converts a degrees/minutes/seconds triple to decimal degrees. Pure
/// arithmetic; out-of-range inputs propagate into the output unchecked.
fn to_decimal(dms: &DmsCoordinate) -> f64 {
    dms.degrees + dms.minutes / MINUTES_PER_DEGREE + dms.seconds / SECONDS_PER_DEGREE
}

pub fn to_decimal_latitude(dms: &DmsCoordinate) -> f64 {
    to_decimal(dms)
}

/// Every station in the survey lies in the western hemisphere, so the raw
/// magnitude is negated.
pub fn to_decimal_longitude(dms: &DmsCoordinate) -> f64 {
    -to_decimal(dms)
}
