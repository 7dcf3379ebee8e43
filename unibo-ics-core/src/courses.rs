//! Course table decoding.
//!
//! The catalogue publishes the degree programme table as CSV with a header
//! row and fifteen positional columns. The column layout is an implicit
//! contract with the upstream portal; it is spelled out once in [`col`] and
//! every decode/encode goes through it.

use std::io;

use serde::Serialize;

use crate::{Error, Result};

/// Number of columns in a course row.
pub const COURSE_COLUMNS: usize = 15;

/// Positional schema of the course table.
#[allow(missing_docs)]
pub mod col {
    pub const ANNO_ACCADEMICO: usize = 0;
    pub const IMMATRICOLABILE: usize = 1;
    pub const CODICE: usize = 2;
    pub const DESCRIZIONE: usize = 3;
    pub const URL: usize = 4;
    pub const CAMPUS: usize = 5;
    pub const SEDE_DIDATTICA: usize = 6;
    pub const AMBITI: usize = 7;
    pub const TIPOLOGIA: usize = 8;
    pub const DURATA_ANNI: usize = 9;
    pub const INTERNAZIONALE: usize = 10;
    pub const INTERNAZIONALE_TITOLO: usize = 11;
    pub const INTERNAZIONALE_LINGUA: usize = 12;
    pub const LINGUE: usize = 13;
    pub const ACCESSO: usize = 14;
}

/// One decoded row of the course table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// Academic year, e.g. `2023/2024`
    pub anno_accademico: String,
    /// Whether the course currently accepts enrollments
    pub immatricolabile: String,
    /// Numeric course code
    pub codice: u32,
    pub descrizione: String,
    /// Course webpage, scraped for the website identifier
    pub url: String,
    pub campus: String,
    pub sede_didattica: String,
    /// Subject areas
    pub ambiti: String,
    /// Degree type, e.g. `L` or `LM`
    pub tipologia: String,
    /// Programme duration in years
    pub durata_anni: u32,
    /// International programme flag
    pub internazionale: bool,
    pub internazionale_titolo: String,
    pub internazionale_lingua: String,
    /// Language(s) of instruction
    pub lingue: String,
    /// Admission mode
    pub accesso: String,
}

impl Course {
    /// Decode a course from one CSV record.
    fn from_record(record: &csv::StringRecord) -> Result<Self> {
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() < COURSE_COLUMNS {
            return Err(Error::ShortRow {
                line,
                expected: COURSE_COLUMNS,
                found: record.len(),
            });
        }

        let text = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        Ok(Self {
            anno_accademico: text(col::ANNO_ACCADEMICO),
            immatricolabile: text(col::IMMATRICOLABILE),
            codice: int_field(record, line, col::CODICE, "codice")?,
            descrizione: text(col::DESCRIZIONE),
            url: text(col::URL),
            campus: text(col::CAMPUS),
            sede_didattica: text(col::SEDE_DIDATTICA),
            ambiti: text(col::AMBITI),
            tipologia: text(col::TIPOLOGIA),
            durata_anni: int_field(record, line, col::DURATA_ANNI, "durata_anni")?,
            internazionale: bool_field(record, line, col::INTERNAZIONALE, "internazionale")?,
            internazionale_titolo: text(col::INTERNAZIONALE_TITOLO),
            internazionale_lingua: text(col::INTERNAZIONALE_LINGUA),
            lingue: text(col::LINGUE),
            accesso: text(col::ACCESSO),
        })
    }

    /// Re-encode the course into its fifteen-column row layout.
    ///
    /// Inverse of decoding for string columns; integer and boolean columns
    /// come back in canonical form.
    pub fn to_record(&self) -> [String; COURSE_COLUMNS] {
        let mut row: [String; COURSE_COLUMNS] = Default::default();
        row[col::ANNO_ACCADEMICO] = self.anno_accademico.clone();
        row[col::IMMATRICOLABILE] = self.immatricolabile.clone();
        row[col::CODICE] = self.codice.to_string();
        row[col::DESCRIZIONE] = self.descrizione.clone();
        row[col::URL] = self.url.clone();
        row[col::CAMPUS] = self.campus.clone();
        row[col::SEDE_DIDATTICA] = self.sede_didattica.clone();
        row[col::AMBITI] = self.ambiti.clone();
        row[col::TIPOLOGIA] = self.tipologia.clone();
        row[col::DURATA_ANNI] = self.durata_anni.to_string();
        row[col::INTERNAZIONALE] = self.internazionale.to_string();
        row[col::INTERNAZIONALE_TITOLO] = self.internazionale_titolo.clone();
        row[col::INTERNAZIONALE_LINGUA] = self.internazionale_lingua.clone();
        row[col::LINGUE] = self.lingue.clone();
        row[col::ACCESSO] = self.accesso.clone();
        row
    }
}

/// Decode the whole course table.
///
/// The header row is read and discarded. Output order matches input row
/// order. The first row that fails to decode aborts the decode; there is no
/// best-effort mode.
pub fn decode_courses<R: io::Read>(reader: R) -> Result<Vec<Course>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut courses = Vec::new();
    for record in csv_reader.records() {
        courses.push(Course::from_record(&record?)?);
    }
    Ok(courses)
}

/// Order courses by academic year, then by description.
pub fn sort_courses(courses: &mut [Course]) {
    courses.sort_by(|a, b| {
        a.anno_accademico
            .cmp(&b.anno_accademico)
            .then_with(|| a.descrizione.cmp(&b.descrizione))
    });
}

fn int_field(
    record: &csv::StringRecord,
    line: u64,
    idx: usize,
    column: &'static str,
) -> Result<u32> {
    let raw = record.get(idx).unwrap_or_default();
    raw.trim().parse().map_err(|e| Error::Field {
        line,
        column,
        message: format!("{e}: {raw:?}"),
    })
}

/// The upstream table encodes booleans the way Go's `strconv.ParseBool`
/// reads them; accept that whole form set.
fn bool_field(
    record: &csv::StringRecord,
    line: u64,
    idx: usize,
    column: &'static str,
) -> Result<bool> {
    let raw = record.get(idx).unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(Error::Field {
            line,
            column,
            message: format!("invalid boolean: {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Anno Accademico,Immatricolabile,Codice,Descrizione,Url,Campus,Sede didattica,Ambiti,Tipologia,Durata Anni,Internazionale,Titolo internazionale,Lingua internazionale,Lingue,Accesso";

    fn decode(rows: &str) -> Result<Vec<Course>> {
        let table = format!("{HEADER}\n{rows}");
        decode_courses(table.as_bytes())
    }

    #[test]
    fn decodes_a_full_row() {
        let courses = decode(
            r#"2023/2024,SI,1234,"Example Course",https://x,Bo,Bo,Area,L,3,true,Title,En,en,libero"#,
        )
        .unwrap();

        assert_eq!(courses.len(), 1);
        let course = &courses[0];
        assert_eq!(course.anno_accademico, "2023/2024");
        assert_eq!(course.codice, 1234);
        assert_eq!(course.descrizione, "Example Course");
        assert_eq!(course.durata_anni, 3);
        assert!(course.internazionale);
        assert_eq!(course.accesso, "libero");
    }

    #[test]
    fn preserves_input_row_order() {
        let courses = decode(
            "2023/2024,SI,2,B,https://b,Bo,Bo,Area,L,3,false,,,it,libero\n\
             2023/2024,SI,1,A,https://a,Bo,Bo,Area,L,3,false,,,it,libero",
        )
        .unwrap();

        let codes: Vec<u32> = courses.iter().map(|c| c.codice).collect();
        assert_eq!(codes, vec![2, 1]);
    }

    #[test]
    fn bad_integer_aborts_the_decode() {
        let err = decode(
            "2023/2024,SI,abc,A,https://a,Bo,Bo,Area,L,3,false,,,it,libero\n\
             2023/2024,SI,1,B,https://b,Bo,Bo,Area,L,3,false,,,it,libero",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Field {
                column: "codice",
                ..
            }
        ));
    }

    #[test]
    fn bad_boolean_aborts_the_decode() {
        let err =
            decode("2023/2024,SI,1,A,https://a,Bo,Bo,Area,L,3,maybe,,,it,libero").unwrap_err();

        assert!(matches!(
            err,
            Error::Field {
                column: "internazionale",
                ..
            }
        ));
    }

    #[test]
    fn tolerant_boolean_forms_decode() {
        for (raw, expected) in [("1", true), ("T", true), ("0", false), ("FALSE", false)] {
            let row = format!("2023/2024,SI,1,A,https://a,Bo,Bo,Area,L,3,{raw},,,it,libero");
            let courses = decode(&row).unwrap();
            assert_eq!(courses[0].internazionale, expected, "raw form {raw:?}");
        }
    }

    #[test]
    fn short_row_aborts_the_decode() {
        let err = decode("2023/2024,SI,1,A").unwrap_err();

        assert!(matches!(
            err,
            Error::ShortRow {
                expected: COURSE_COLUMNS,
                found: 4,
                ..
            }
        ));
    }

    #[test]
    fn record_round_trips_through_the_schema() {
        let row = r#"2023/2024,SI,1234,"Example Course",https://x,Bo,Bo,Area,L,3,true,Title,En,en,libero"#;
        let courses = decode(row).unwrap();
        let record = courses[0].to_record();

        assert_eq!(
            record,
            [
                "2023/2024",
                "SI",
                "1234",
                "Example Course",
                "https://x",
                "Bo",
                "Bo",
                "Area",
                "L",
                "3",
                "true",
                "Title",
                "En",
                "en",
                "libero",
            ]
            .map(String::from)
        );

        // A record fed back through the decoder yields the same course.
        let reencoded = format!("{HEADER}\n{}", record.join(","));
        let again = decode_courses(reencoded.as_bytes()).unwrap();
        assert_eq!(again[0], courses[0]);
    }

    #[test]
    fn sorts_by_year_then_description() {
        let mut courses = decode(
            "2024/2025,SI,3,Alfa,https://c,Bo,Bo,Area,L,3,false,,,it,libero\n\
             2023/2024,SI,2,Beta,https://b,Bo,Bo,Area,L,3,false,,,it,libero\n\
             2023/2024,SI,1,Alfa,https://a,Bo,Bo,Area,L,3,false,,,it,libero",
        )
        .unwrap();

        sort_courses(&mut courses);
        let codes: Vec<u32> = courses.iter().map(|c| c.codice).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }
}
