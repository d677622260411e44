mod common;

use common::{mock_xlsx, sample_request};
use procura_core::reader::{decode_workbook, read_workbook};
use procura_core::{Extractor, ProcessingError, Session, SessionState};

#[test]
fn test_end_to_end_request() {
    let mut session = Session::default();
    let extraction = session.process_file(&sample_request()).unwrap();

    assert_eq!(extraction.sheet_names(), vec!["Materiales"]);
    let sheet = extraction.get("Materiales").unwrap();
    assert_eq!(sheet.header_row, 1);
    assert_eq!(
        sheet.keys,
        vec!["item", "codigo", "descripcion", "unidad", "cant"]
    );
    assert_eq!(sheet.records.len(), 1);

    let record = serde_json::to_value(&sheet.records[0]).unwrap();
    assert_eq!(
        record,
        serde_json::json!({
            "id": 1,
            "item": "1",
            "codigo": "A-100",
            "descripcion": "Tubo PVC",
            "unidad": "m",
            "cant": "50"
        })
    );
    assert_eq!(session.active_sheet_name(), Some("Materiales"));
}

#[test]
fn test_sheet_order_and_skipping() {
    let bytes = mock_xlsx(&[
        ("Portada", vec![]),
        (
            "Electricos",
            vec![
                vec!["REQUISICIÓN No. 12"],
                vec!["NO DE ITEM", "DESCRIPCION", "UNIDAD", "CANT", "Observaciones"],
                vec!["1", "Cable #12", "m", "100", ""],
                vec!["2", "Breaker 20A", "u", "4", "Urgente"],
            ],
        ),
        ("Notas", vec![vec!["TOTAL", "", "0"]]),
        (
            "Plomeria",
            vec![
                vec!["Item", "Descripción", "Cant"],
                vec!["A-100", "Válvula 2\"", "10"],
            ],
        ),
    ]);

    let workbook = decode_workbook(&bytes).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Portada", "Electricos", "Notas", "Plomeria"]
    );

    let extraction = Extractor::default().extract_workbook(&workbook);
    assert_eq!(extraction.sheet_names(), vec!["Electricos", "Plomeria"]);

    let electricos = extraction.get("Electricos").unwrap();
    assert_eq!(
        electricos.keys,
        vec!["no_de_item", "descripcion", "unidad", "cant", "observaciones"]
    );
    assert_eq!(electricos.records[1].get("observaciones"), Some("Urgente"));
    assert_eq!(electricos.records[0].get("observaciones"), Some(""));

    let plomeria = extraction.get("Plomeria").unwrap();
    assert_eq!(plomeria.records[0].get("descripcion"), Some("Válvula 2\""));
}

#[test]
fn test_reprocessing_restarts_ids() {
    let bytes = mock_xlsx(&[(
        "Hoja1",
        vec![
            vec!["Item", "Descripción", "Cant"],
            vec!["1", "Codo", "3"],
            vec!["2", "Tee", "4"],
            vec!["3", "Unión", "5"],
        ],
    )]);

    let mut session = Session::default();
    session.process_file(&bytes).unwrap();
    session.update_cell("Hoja1", 1, "cant", "30").unwrap();
    session.delete_record("Hoja1", 2).unwrap();

    let sheet = session.sheet("Hoja1").unwrap();
    assert_eq!(sheet.record(1).unwrap().get("cant"), Some("30"));
    assert!(sheet.record(2).is_none());

    let extraction = session.process_file(&bytes).unwrap();
    let ids: Vec<u32> = extraction.get("Hoja1").unwrap().records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(session.record("Hoja1", 1).unwrap().get("cant"), Some("3"));
}

#[test]
fn test_unlabelled_column_and_header_like_descriptions() {
    let bytes = mock_xlsx(&[(
        "Audiovisuales",
        vec![
            vec!["Item", "Descripción", "Cant"],
            vec!["1", "Codo", "3", "urgente"],
            vec!["2", "Proyector multimedia", "1"],
            vec!["TOTAL", "", "4"],
        ],
    )]);

    let extraction = Session::default().process_file(&bytes).unwrap().clone();
    let sheet = extraction.get("Audiovisuales").unwrap();
    assert_eq!(sheet.keys, vec!["item", "descripcion", "cant", "columna_3"]);
    assert_eq!(sheet.records.len(), 2);
    assert_eq!(sheet.records[0].get("columna_3"), Some("urgente"));
    assert_eq!(sheet.records[1].get("descripcion"), Some("Proyector multimedia"));
    assert_eq!(sheet.records[1].get("columna_3"), Some(""));
}

#[test]
fn test_workbook_without_data() {
    let bytes = mock_xlsx(&[("Vacia", vec![]), ("Titulo", vec![vec!["FO-PROC-02"]])]);

    let mut session = Session::default();
    let extraction = session.process_file(&bytes).unwrap();
    assert!(extraction.is_empty());
    assert!(matches!(
        extraction.ensure_not_empty(),
        Err(ProcessingError::EmptyWorkbook)
    ));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.active_sheet().is_none());
}

#[test]
fn test_decode_failure_keeps_nothing() {
    let mut session = Session::default();
    session.process_file(&sample_request()).unwrap();

    let mut truncated = sample_request();
    truncated.truncate(truncated.len() / 2);
    assert!(matches!(
        session.process_file(&truncated),
        Err(ProcessingError::Decode(_))
    ));
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.extraction().is_none());
}

#[test]
fn test_read_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solicitud.xlsx");
    std::fs::write(&path, sample_request()).unwrap();

    let workbook = read_workbook(&path).unwrap();
    assert_eq!(workbook.sheets[0].rows[0], vec!["FO-PROC-01"]);
    assert_eq!(workbook.sheets[0].rows[3], vec!["TOTAL", "", "", "", "50"]);

    assert!(matches!(
        read_workbook(dir.path().join("missing.xlsx")),
        Err(ProcessingError::Io(_))
    ));
}
