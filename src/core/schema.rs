//! Named access to the fields of a session header record.
//!
//! A header line written by the device looks like
//!
//! ```text
//! Ver 2.1,17,DATE, 2022-07-27,TIME,10,15,42,Qmax,18.4,Tpeak,6.3,Ttotal,24.9,Volscale,312,Volvisual,320,Calib,1.02
//! ```
//!
//! Values sit at fixed positions; the label before each value is checked so a
//! shifted column is reported instead of silently misread.

use crate::errors::{AppError, AppResult};
use csv::StringRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Marker,
    Date,
    Hour,
    Minute,
    Second,
    QMax,
    TPeak,
    TEnd,
    VolumeScale,
    VolumeVisual,
}

impl HeaderField {
    pub fn index(self) -> usize {
        match self {
            HeaderField::Marker => 0,
            HeaderField::Date => 3,
            HeaderField::Hour => 5,
            HeaderField::Minute => 6,
            HeaderField::Second => 7,
            HeaderField::QMax => 9,
            HeaderField::TPeak => 11,
            HeaderField::TEnd => 13,
            HeaderField::VolumeScale => 15,
            HeaderField::VolumeVisual => 17,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderField::Marker => "marker",
            HeaderField::Date => "date",
            HeaderField::Hour => "hour",
            HeaderField::Minute => "minute",
            HeaderField::Second => "second",
            HeaderField::QMax => "qmax",
            HeaderField::TPeak => "tpeak",
            HeaderField::TEnd => "ttotal",
            HeaderField::VolumeScale => "volscale",
            HeaderField::VolumeVisual => "volvisual",
        }
    }
}

/// Label cells expected in front of the values (position, text).
const LABELS: &[(usize, &str)] = &[
    (2, "DATE"),
    (4, "TIME"),
    (8, "Qmax"),
    (10, "Tpeak"),
    (12, "Ttotal"),
    (14, "Volscale"),
    (16, "Volvisual"),
];

const MIN_FIELDS: usize = 18;

/// Marker substring identifying a session header.
pub const HEADER_MARKER: &str = "Ver";

pub fn is_header(record: &StringRecord) -> bool {
    record
        .get(HeaderField::Marker.index())
        .is_some_and(|f| f.contains(HEADER_MARKER))
}

/// A header record that passed layout validation.
#[derive(Debug)]
pub struct HeaderRecord<'a> {
    record: &'a StringRecord,
}

impl<'a> HeaderRecord<'a> {
    pub fn validate(record: &'a StringRecord) -> AppResult<Self> {
        if record.len() < MIN_FIELDS {
            return Err(AppError::SchemaMismatch(format!(
                "expected at least {MIN_FIELDS} fields, found {}",
                record.len()
            )));
        }

        for (pos, label) in LABELS {
            let found = record.get(*pos).unwrap_or("").trim();
            if !found.eq_ignore_ascii_case(label) {
                return Err(AppError::SchemaMismatch(format!(
                    "field {pos} should be '{label}', found '{found}'"
                )));
            }
        }

        Ok(Self { record })
    }

    /// Raw text of a field. Validation guarantees every field is present.
    pub fn get(&self, field: HeaderField) -> &'a str {
        self.record.get(field.index()).unwrap_or("")
    }

    /// Date text without its one-character prefix.
    pub fn date_text(&self) -> &'a str {
        let raw = self.get(HeaderField::Date);
        match raw.char_indices().nth(1) {
            Some((i, _)) => &raw[i..],
            None => "",
        }
    }

    pub fn parse_u32(&self, field: HeaderField) -> AppResult<u32> {
        let raw = self.get(field);
        raw.trim().parse().map_err(|_| AppError::NumberParse {
            field: field.name(),
            value: raw.to_string(),
        })
    }

    pub fn parse_f32(&self, field: HeaderField) -> AppResult<f32> {
        let raw = self.get(field);
        raw.trim().parse().map_err(|_| AppError::NumberParse {
            field: field.name(),
            value: raw.to_string(),
        })
    }
}
