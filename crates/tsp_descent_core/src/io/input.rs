use std::io::Read;

use crate::error::{Error, Result};
use crate::io::options::SolverOptions;
use crate::location::Location;

/// Problem text from the configured input path, or stdin when none.
pub fn read_input_text(options: &SolverOptions) -> Result<String> {
    match options.input_path() {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Parse locations from either supported format.
///
/// TSPLIB is recognized by the `DIMENSION` token anywhere in the text;
/// everything else is treated as a `loc=<x>,<y>&...` query string.
/// Fewer than two locations is an `EmptyProblem`.
pub fn parse_locations(input: &str) -> Result<Vec<Location>> {
    let locations = if input.contains("DIMENSION") {
        parse_tsplib(input)?
    } else {
        parse_query(input)?
    };

    if locations.len() < 2 {
        return Err(Error::EmptyProblem);
    }
    Ok(locations)
}

fn parse_query(input: &str) -> Result<Vec<Location>> {
    let mut locations = Vec::new();
    for record in input.split('&') {
        locations.push(parse_query_record(record, locations.len())?);
    }
    Ok(locations)
}

/// A record is `loc=<x>,<y>`: both fields decimals with an optional
/// leading minus and an optional fraction, trailing whitespace
/// tolerated. `position` is 0-based, diagnostics are 1-based.
fn parse_query_record(record: &str, position: usize) -> Result<Location> {
    let invalid = || Error::InvalidLocationSyntax {
        position: position + 1,
    };

    let fields = record.strip_prefix("loc=").ok_or_else(invalid)?;
    let (x_text, y_text) = fields.split_once(',').ok_or_else(invalid)?;
    let y_text = y_text.trim_end();
    if !is_decimal(x_text) || !is_decimal(y_text) {
        return Err(invalid());
    }

    let x: f64 = x_text.parse().map_err(|_| invalid())?;
    let y: f64 = y_text.parse().map_err(|_| invalid())?;
    Ok(Location::new(x, y, position))
}

/// `-?[0-9]+(\.[0-9]*)?`
fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };
    !integer.is_empty()
        && integer.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn parse_tsplib(input: &str) -> Result<Vec<Location>> {
    let dimension = parse_dimension(input)?;
    let (_, section) = input
        .split_once("NODE_COORD_SECTION")
        .ok_or_else(|| Error::tsplib_header("missing NODE_COORD_SECTION"))?;

    let mut fields = section.split_whitespace();
    let mut locations = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let index: usize = parse_node_field(fields.next())?;
        let x: f64 = parse_node_field(fields.next())?;
        let y: f64 = parse_node_field(fields.next())?;
        locations.push(Location::new(x, y, index));
    }
    Ok(locations)
}

fn parse_dimension(input: &str) -> Result<usize> {
    let header = || Error::tsplib_header("missing or unparsable DIMENSION");

    let (_, rest) = input.split_once("DIMENSION").ok_or_else(header)?;
    let rest = rest.trim_start().strip_prefix(':').ok_or_else(header)?;
    rest.split_whitespace()
        .next()
        .ok_or_else(header)?
        .parse()
        .map_err(|_| header())
}

fn parse_node_field<T: std::str::FromStr>(field: Option<&str>) -> Result<T> {
    field
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| Error::tsplib_header("truncated NODE_COORD_SECTION record"))
}

#[cfg(test)]
mod tests {
    use super::{is_decimal, parse_locations};
    use crate::error::Error;

    #[test]
    fn query_records_parse_in_order_with_input_indices() {
        let locations =
            parse_locations("loc=0,0&loc=0,10&loc=10,10&loc=10,0").expect("parse query");

        assert_eq!(locations.len(), 4);
        assert_eq!((locations[1].x, locations[1].y), (0.0, 10.0));
        assert_eq!(locations[3].index, 3);
    }

    #[test]
    fn query_accepts_signs_fractions_and_trailing_whitespace() {
        let locations = parse_locations("loc=-1.5,2.&loc=0.25,-3 \n").expect("parse query");

        assert_eq!((locations[0].x, locations[0].y), (-1.5, 2.0));
        assert_eq!((locations[1].x, locations[1].y), (0.25, -3.0));
    }

    #[test]
    fn bad_record_reports_its_one_based_position() {
        let err = parse_locations("loc=0,0&loc=x,1").expect_err("invalid record");
        assert!(matches!(err, Error::InvalidLocationSyntax { position: 2 }));
    }

    #[test]
    fn records_without_the_loc_prefix_are_rejected() {
        let err = parse_locations("0,0&loc=1,1").expect_err("missing prefix");
        assert!(matches!(err, Error::InvalidLocationSyntax { position: 1 }));
    }

    #[test]
    fn records_with_extra_fields_are_rejected() {
        let err = parse_locations("loc=1,2,3&loc=0,0").expect_err("extra comma field");
        assert!(matches!(err, Error::InvalidLocationSyntax { position: 1 }));
    }

    #[test]
    fn a_single_location_is_an_empty_problem() {
        let err = parse_locations("loc=0,0").expect_err("single location");
        assert!(matches!(err, Error::EmptyProblem));
    }

    #[test]
    fn decimal_grammar_matches_the_record_format() {
        assert!(is_decimal("0"));
        assert!(is_decimal("-12.5"));
        assert!(is_decimal("3."));
        assert!(!is_decimal(""));
        assert!(!is_decimal(".5"));
        assert!(!is_decimal("+1"));
        assert!(!is_decimal("1e3"));
        assert!(!is_decimal("1.2.3"));
    }

    #[test]
    fn tsplib_nodes_keep_their_file_indices() {
        let input = "NAME : crossed\nDIMENSION : 4\nNODE_COORD_SECTION\n\
                     1 0 0\n2 10 10\n3 0 10\n4 10 0\nEOF\n";
        let locations = parse_locations(input).expect("parse tsplib");

        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0].index, 1);
        assert_eq!((locations[1].x, locations[1].y), (10.0, 10.0));
        assert_eq!(locations[3].index, 4);
    }

    #[test]
    fn tsplib_without_a_dimension_value_fails() {
        let err = parse_locations("DIMENSION :\nNODE_COORD_SECTION\n1 0 0\n")
            .expect_err("missing dimension value");
        assert!(matches!(err, Error::InvalidTsplibHeader(_)));
    }

    #[test]
    fn tsplib_without_a_coord_section_fails() {
        let err = parse_locations("DIMENSION : 3\n1 0 0\n2 1 1\n3 2 2\n")
            .expect_err("missing section");
        assert!(matches!(err, Error::InvalidTsplibHeader(_)));
    }

    #[test]
    fn tsplib_with_truncated_records_fails() {
        let err = parse_locations("DIMENSION : 3\nNODE_COORD_SECTION\n1 0 0\n2 1\nEOF")
            .expect_err("truncated records");
        assert!(matches!(err, Error::InvalidTsplibHeader(_)));
    }
}
