//! Conversion of colon-delimited sexagesimal strings, as printed by MIRIAD, to
//! floats.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SexagesimalError {
    #[error("'{0}' is not a sexagesimal value (expected 1 to 3 colon-separated fields)")]
    WrongFieldCount(String),

    #[error("Couldn't parse field '{field}' of sexagesimal value '{value}' as a number")]
    BadField { value: String, field: String },
}

/// Convert a sexagesimal string delimited by colons (e.g. `-63:42:45.6`) to a
/// float in the same unit as its leading field.
///
/// The sign is taken from the string rather than the leading field, so
/// `-00:30:00` is -0.5 and not 0.5.
pub fn sexagesimal_colon_str_to_float(s: &str) -> Result<f64, SexagesimalError> {
    let trimmed = s.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut fields = [0.0_f64; 3];
    let mut num_fields = 0;
    for field in unsigned.split(':') {
        if num_fields == 3 {
            return Err(SexagesimalError::WrongFieldCount(s.to_string()));
        }
        fields[num_fields] = field.parse().map_err(|_| SexagesimalError::BadField {
            value: s.to_string(),
            field: field.to_string(),
        })?;
        num_fields += 1;
    }

    let [a, b, c] = fields;
    let num = a.abs() + b / 60.0 + c / 3600.0;
    Ok(if negative { -num } else { num })
}

/// Convert a declination-like string (`±DD:MM:SS.S`) to \[degrees\].
pub fn sexagesimal_dms_to_degrees(dms: &str) -> Result<f64, SexagesimalError> {
    sexagesimal_colon_str_to_float(dms)
}

/// Convert a right-ascension-like string (`HH:MM:SS.S`) to \[hours\].
pub fn sexagesimal_hms_to_hours(hms: &str) -> Result<f64, SexagesimalError> {
    sexagesimal_colon_str_to_float(hms)
}

/// Convert a right-ascension-like string (`HH:MM:SS.S`) to \[degrees\].
pub fn sexagesimal_hms_to_degrees(hms: &str) -> Result<f64, SexagesimalError> {
    Ok(sexagesimal_hms_to_hours(hms)? * 15.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_dms() {
        let f = sexagesimal_dms_to_degrees("-22:58:52.56").unwrap();
        assert_abs_diff_eq!(f, -22.981267, epsilon = 1e-6);

        let f = sexagesimal_dms_to_degrees("+63:42:45.6").unwrap();
        assert_abs_diff_eq!(f, 63.7126667, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_zero_degrees() {
        let f = sexagesimal_dms_to_degrees("-00:30:00").unwrap();
        assert_abs_diff_eq!(f, -0.5);
    }

    #[test]
    fn test_hms() {
        let h = sexagesimal_hms_to_hours("19:39:25.03").unwrap();
        assert_abs_diff_eq!(h, 19.656952777, epsilon = 1e-8);
        let d = sexagesimal_hms_to_degrees("19:39:25.03").unwrap();
        assert_abs_diff_eq!(d, h * 15.0, epsilon = 1e-10);
    }

    #[test]
    fn test_partial_fields() {
        assert_abs_diff_eq!(sexagesimal_dms_to_degrees("-30:18").unwrap(), -30.3);
        assert_abs_diff_eq!(sexagesimal_dms_to_degrees("12").unwrap(), 12.0);
    }

    #[test]
    fn test_bad_strings() {
        assert_eq!(
            sexagesimal_dms_to_degrees("1:2:3:4"),
            Err(SexagesimalError::WrongFieldCount("1:2:3:4".to_string()))
        );
        assert!(matches!(
            sexagesimal_dms_to_degrees("12:ab:00"),
            Err(SexagesimalError::BadField { .. })
        ));
        assert!(sexagesimal_dms_to_degrees("").is_err());
    }
}
