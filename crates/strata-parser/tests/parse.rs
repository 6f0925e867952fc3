use strata_parser::{error::ErrorCode, parse_centrality, parse_matrix};

fn codes(err: &strata_parser::error::ParseError) -> Vec<ErrorCode> {
    err.diagnostics().iter().filter_map(|d| d.code()).collect()
}

#[test]
fn test_matrix_strips_identifier_column() {
    let source = "Name;LB;SD_IFOF;CD_Insula\n\
                  LB;1;0.3;-0.2\n\
                  SD_IFOF;0.3;1;0.175\n\
                  CD_Insula;-0.2;0.175;1\n";

    let matrix = parse_matrix(source).expect("Failed to parse");

    assert_eq!(matrix.column_names(), ["LB", "SD_IFOF", "CD_Insula"]);
    assert_eq!(matrix.row_names(), ["LB", "SD_IFOF", "CD_Insula"]);
    assert!(matrix.is_square());
    assert_eq!(matrix.value(0, 2), -0.2);
    assert_eq!(matrix.value(1, 2), 0.175);
}

#[test]
fn test_matrix_windows_line_endings_and_missing_values() {
    let source = "Name;A;B\r\nA;1;\r\nB;nan;1\r\n\r\n";

    let matrix = parse_matrix(source).expect("Failed to parse");

    assert!(matrix.value(0, 1).is_nan());
    assert!(matrix.value(1, 0).is_nan());
    assert_eq!(matrix.value(1, 1), 1.0);
}

#[test]
fn test_matrix_quoted_names() {
    let source = "\"\";\"FLU_A\";\"FLU_P\"\n\"FLU_A\";1;0.8\n\"FLU_P\";0.8;1\n";

    let matrix = parse_matrix(source).expect("Failed to parse");
    assert_eq!(matrix.column_names(), ["FLU_A", "FLU_P"]);
}

#[test]
fn test_matrix_without_rows_is_not_square() {
    let matrix = parse_matrix("Name;A;B\n").expect("Failed to parse");
    assert_eq!(matrix.rows(), 0);
    assert_eq!(matrix.columns(), 2);
    assert!(!matrix.is_square());
}

#[test]
fn test_matrix_missing_header() {
    let err = parse_matrix("\n\n").unwrap_err();
    assert_eq!(codes(&err), vec![ErrorCode::E100]);
}

#[test]
fn test_matrix_header_without_columns() {
    let err = parse_matrix("Name\nA\n").unwrap_err();
    assert_eq!(codes(&err), vec![ErrorCode::E102]);
}

#[test]
fn test_matrix_ragged_row_points_at_header() {
    let source = "Name;A;B\nA;1;0.5\nB;0.5\n";
    let err = parse_matrix(source).unwrap_err();

    assert_eq!(codes(&err), vec![ErrorCode::E101]);
    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.message(), "row `B` has 2 cells, expected 3");

    let labels = diagnostic.labels();
    assert_eq!(labels.len(), 2);
    assert_eq!(
        &source[labels[0].span().start()..labels[0].span().end()],
        "B;0.5"
    );
    assert_eq!(
        &source[labels[1].span().start()..labels[1].span().end()],
        "Name;A;B"
    );
}

#[test]
fn test_matrix_reports_every_invalid_number() {
    let source = "Name;A;B\nA;1;abc\nB;0,5;1\n";
    let err = parse_matrix(source).unwrap_err();

    assert_eq!(codes(&err), vec![ErrorCode::E200, ErrorCode::E200]);
    let span = err.diagnostics()[1].labels()[0].span();
    assert_eq!(&source[span.start()..span.end()], "0,5");
}

#[test]
fn test_matrix_empty_column_name() {
    let err = parse_matrix("Name;A;\nA;1;0.5\n;0.5;1\n").unwrap_err();
    assert_eq!(codes(&err), vec![ErrorCode::E103, ErrorCode::E103]);
}

#[test]
fn test_centrality_reads_first_value_column() {
    let source = "Node;betweenness;degree\nLB;0.25;3\nSD_IFOF;0;1\n";

    let map = parse_centrality(source).expect("Failed to parse");

    assert_eq!(map.metric(), Some("betweenness"));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("LB"), Some(0.25));
    assert_eq!(map.get("SD_IFOF"), Some(0.0));
}

#[test]
fn test_centrality_errors() {
    let source = "Node;degree\nLB;\nLB;0.1\nSD_IFOF\nCD_Insula;high\n";
    let err = parse_centrality(source).unwrap_err();

    assert_eq!(
        codes(&err),
        vec![
            ErrorCode::E201,
            ErrorCode::E104,
            ErrorCode::E101,
            ErrorCode::E200
        ]
    );
}

mod properties {
    use proptest::prelude::*;

    use strata_parser::{parse_centrality, parse_matrix};

    proptest! {
        #[test]
        fn test_reader_never_panics(source in "[A-Za-z0-9_;.\"\\-\r\n ]{0,200}") {
            let _ = parse_matrix(&source);
            let _ = parse_centrality(&source);
        }

        #[test]
        fn test_generated_matrix_roundtrip(values in prop::collection::vec(-1.0f64..1.0, 9)) {
            let names = ["A", "B", "C"];
            let mut source = String::from("Name;A;B;C\n");
            for (row, name) in names.iter().enumerate() {
                let cells: Vec<String> = values[row * 3..row * 3 + 3]
                    .iter()
                    .map(|value| value.to_string())
                    .collect();
                source.push_str(&format!("{name};{}\n", cells.join(";")));
            }

            let matrix = parse_matrix(&source).unwrap();

            prop_assert!(matrix.is_square());
            for row in 0..3 {
                for column in 0..3 {
                    prop_assert_eq!(matrix.value(row, column), values[row * 3 + column]);
                }
            }
        }
    }
}
