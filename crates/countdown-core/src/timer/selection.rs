use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const HOURS_RANGE: RangeInclusive<u8> = 0..=23;
pub const MINUTES_RANGE: RangeInclusive<u8> = 0..=59;
pub const SECONDS_RANGE: RangeInclusive<u8> = 0..=59;

/// The hours/minutes/seconds picked before a countdown starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSelection {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Default for DurationSelection {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 10,
        }
    }
}

impl DurationSelection {
    /// Build a selection, rejecting components outside the picker ranges.
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Result<Self, ValidationError> {
        check("hours", hours as u64, &HOURS_RANGE)?;
        check("minutes", minutes as u64, &MINUTES_RANGE)?;
        check("seconds", seconds as u64, &SECONDS_RANGE)?;
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn total_secs(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

fn check(field: &'static str, value: u64, range: &RangeInclusive<u8>) -> Result<u8, ValidationError> {
    if value > *range.end() as u64 {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            max: *range.end(),
        });
    }
    Ok(value as u8)
}

impl fmt::Display for DurationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}h {:02}m {:02}s",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Accepts `HH:MM:SS`, `MM:SS`, `SS` or unit form like `1h30m`, `45s`.
impl FromStr for DurationSelection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |message: &str| ValidationError::InvalidFormat {
            input: input.to_string(),
            message: message.to_string(),
        };
        if input.is_empty() {
            return Err(invalid("empty duration"));
        }

        let mut parts = [0u64; 3];
        if input.contains(':') {
            let fields: Vec<&str> = input.split(':').collect();
            if fields.len() > 3 {
                return Err(invalid("expected at most HH:MM:SS"));
            }
            let offset = 3 - fields.len();
            for (i, field) in fields.iter().enumerate() {
                parts[offset + i] = field
                    .parse::<u64>()
                    .map_err(|_| invalid("fields must be whole numbers"))?;
            }
        } else if input.chars().all(|c| c.is_ascii_digit()) {
            parts[2] = input
                .parse::<u64>()
                .map_err(|_| invalid("seconds must be a whole number"))?;
        } else {
            let mut digits = String::new();
            let mut seen = [false; 3];
            for c in input.chars() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    continue;
                }
                let slot = match c.to_ascii_lowercase() {
                    'h' => 0,
                    'm' => 1,
                    's' => 2,
                    _ => return Err(invalid("unknown unit, use h, m or s")),
                };
                if digits.is_empty() || seen[slot] {
                    return Err(invalid("each unit needs one number"));
                }
                parts[slot] = digits
                    .parse::<u64>()
                    .map_err(|_| invalid("number too large"))?;
                seen[slot] = true;
                digits.clear();
            }
            if !digits.is_empty() {
                return Err(invalid("trailing number without unit"));
            }
        }

        Ok(Self {
            hours: check("hours", parts[0], &HOURS_RANGE)?,
            minutes: check("minutes", parts[1], &MINUTES_RANGE)?,
            seconds: check("seconds", parts[2], &SECONDS_RANGE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_secs_combines_components() {
        let sel = DurationSelection::new(1, 1, 1).unwrap();
        assert_eq!(sel.total_secs(), 3661);
        assert_eq!(DurationSelection::new(23, 59, 59).unwrap().total_secs(), 86_399);
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(DurationSelection::default().total_secs(), 10);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(
            DurationSelection::new(24, 0, 0),
            Err(ValidationError::OutOfRange {
                field: "hours",
                value: 24,
                max: 23
            })
        );
        assert!(DurationSelection::new(0, 60, 0).is_err());
        assert!(DurationSelection::new(0, 0, 60).is_err());
    }

    #[test]
    fn parses_clock_forms() {
        assert_eq!(
            "01:02:03".parse::<DurationSelection>().unwrap(),
            DurationSelection::new(1, 2, 3).unwrap()
        );
        assert_eq!(
            "5:00".parse::<DurationSelection>().unwrap(),
            DurationSelection::new(0, 5, 0).unwrap()
        );
        assert_eq!(
            "42".parse::<DurationSelection>().unwrap(),
            DurationSelection::new(0, 0, 42).unwrap()
        );
    }

    #[test]
    fn parses_unit_form() {
        assert_eq!(
            "1h30m".parse::<DurationSelection>().unwrap(),
            DurationSelection::new(1, 30, 0).unwrap()
        );
        assert_eq!(
            "2M5S".parse::<DurationSelection>().unwrap(),
            DurationSelection::new(0, 2, 5).unwrap()
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<DurationSelection>().is_err());
        assert!("1:2:3:4".parse::<DurationSelection>().is_err());
        assert!("5x".parse::<DurationSelection>().is_err());
        assert!("1h1h".parse::<DurationSelection>().is_err());
        assert!("10m5".parse::<DurationSelection>().is_err());
        assert!("90s".parse::<DurationSelection>().is_err());
    }

    #[test]
    fn display_shows_picker_form() {
        assert_eq!(DurationSelection::default().to_string(), "00h 00m 10s");
    }
}
