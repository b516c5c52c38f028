//! End-to-end tests against real `.xlsx` files written at test time.

use buypressure_core::data::table::locate_table;
use buypressure_core::data::{
    normalize_industries, read_stock_sheet, reporting_date, IndustrySheets, Layout,
    SheetSource, SnapshotResolver, XlsxWorkbook,
};
use buypressure_core::{build_matrix, DataError, SortKey};
use rust_xlsxwriter::Workbook;
use std::path::Path;

enum V {
    S(&'static str),
    N(f64),
    Blank,
}

fn write_book(path: &Path, sheets: &[(&str, Vec<Vec<V>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                match v {
                    V::S(s) => {
                        sheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    V::N(n) => {
                        sheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    V::Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn industry_rows_with_metadata() -> Vec<Vec<V>> {
    vec![
        vec![V::S("Industry multi-condition screen")],
        vec![V::S("Generated"), V::S("2026-02-11 09:00")],
        vec![V::Blank],
        vec![V::S("Industry"), V::S("RS_Rating"), V::S("Buy_Pressure")],
        vec![V::S("Semis"), V::N(95.0), V::N(0.71)],
        vec![V::S("Software"), V::N(88.0), V::N(0.58)],
        vec![V::S("Banks"), V::S("n/a"), V::N(0.41)],
    ]
}

fn results_rows() -> Vec<Vec<V>> {
    vec![
        vec![
            V::S("Symbol"),
            V::S("Company Name"),
            V::S("Industry"),
            V::S("Sector"),
            V::S("Technical_Score"),
            V::S("Screening_Score"),
            V::S("Buy_Pressure"),
        ],
        vec![V::S("A"), V::S("A Corp"), V::S("Semis"), V::S("Technology"), V::N(14.0), V::N(20.0), V::N(0.70)],
        vec![V::S("B"), V::S("B Corp"), V::S("Semis"), V::S("Technology"), V::N(14.0), V::N(18.0), V::N(0.62)],
        vec![V::S("C"), V::S("C Corp"), V::S("Semis"), V::S("Technology"), V::N(10.0), V::N(25.0), V::N(0.52)],
        vec![V::S("D"), V::S("D Corp"), V::S("Software"), V::S("Technology"), V::N(12.0), V::N(19.0), V::N(0.48)],
    ]
}

#[test]
fn resolves_newest_and_normalizes_metadata_layout() {
    let dir = tempfile::tempdir().unwrap();
    write_book(
        &dir.path().join("industry_x_20260210_090000.xlsx"),
        &[("Qualified_Industries", vec![vec![V::S("Industry")]])],
    );
    write_book(
        &dir.path().join("industry_x_20260211_090000.xlsx"),
        &[("Qualified_Industries", industry_rows_with_metadata())],
    );

    let resolver = SnapshotResolver::new(dir.path(), "xlsx");
    let snap = resolver.resolve_latest("industry_x_").unwrap();
    assert!(snap.path.ends_with("industry_x_20260211_090000.xlsx"));
    assert_eq!(reporting_date(&snap.path), "2026-02-10");

    let mut wb = XlsxWorkbook::open(&snap.path).unwrap();
    let tables = normalize_industries(&mut wb, &IndustrySheets::default()).unwrap();
    assert_eq!(tables.report.rows_read, 3);
    assert_eq!(tables.qualifying.len(), 2);
    assert_eq!(tables.report.kept(), 3 - 1);
    assert!(!tables.full_population_found);
}

#[test]
fn first_row_header_with_leading_rank_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("industry_x_20260211_090000.xlsx");
    write_book(
        &path,
        &[(
            "Qualified_Industries",
            vec![
                vec![V::S("Rank"), V::S("Industry"), V::S("RS_Rating"), V::S("Buy_Pressure")],
                vec![V::N(1.0), V::S("Semis"), V::N(95.0), V::N(0.71)],
                vec![V::N(2.0), V::S("Software"), V::N(88.0), V::N(0.58)],
            ],
        )],
    );

    let mut wb = XlsxWorkbook::open(&path).unwrap();
    let grid = wb.read_grid("Qualified_Industries").unwrap();
    let table = locate_table("Qualified_Industries", &grid, "Industry").unwrap();
    assert_eq!(table.layout, Layout::HeaderFirstRow);

    let tables = normalize_industries(&mut wb, &IndustrySheets::default()).unwrap();
    let names: Vec<&str> = tables.qualifying.iter().map(|r| r.industry.as_str()).collect();
    assert_eq!(names, vec!["Semis", "Software"]);
    assert_eq!(tables.qualifying[0].rs_rating, 95.0);
    assert_eq!(tables.qualifying[1].buy_pressure, 0.58);
    assert_eq!(tables.report.rows_dropped, 0);
}

#[test]
fn unsupported_generation_reports_sheet_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("industry_x_20260211_090000.xlsx");
    write_book(
        &path,
        &[
            ("Cover", vec![vec![V::S("Report")]]),
            ("Data", vec![vec![V::S("Sector"), V::S("Score")]]),
        ],
    );
    let mut wb = XlsxWorkbook::open(&path).unwrap();
    let err = normalize_industries(&mut wb, &IndustrySheets::default()).unwrap_err();
    assert!(err.is_schema());
    let msg = err.to_string();
    assert!(msg.contains("Cover") && msg.contains("Data"), "{msg}");
}

#[test]
fn stock_sheet_feeds_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("integrated_screening_20260211_090000.xlsx");
    write_book(&path, &[("Results", results_rows())]);

    let mut wb = XlsxWorkbook::open(&path).unwrap();
    let sheet = read_stock_sheet(&mut wb, "Results").unwrap();
    assert_eq!(sheet.stocks.len(), 4);
    assert_eq!(sheet.sector_map.sector_for("Semis"), "Technology");

    let industries = vec![
        buypressure_core::IndustryRecord::new("Semis", 95.0, 0.71),
        buypressure_core::IndustryRecord::new("Software", 88.0, 0.58),
    ];
    let matrix = build_matrix(&sheet.stocks, &industries, SortKey::Technical, 2);
    let semis: Vec<&str> = matrix[0].stocks.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(semis, vec!["A", "B"]);
    assert_eq!(matrix[1].industry.industry, "Software");
}

#[test]
fn empty_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = SnapshotResolver::new(dir.path(), "xlsx")
        .resolve_latest("industry_x_")
        .unwrap_err();
    assert!(matches!(err, DataError::NoMatchingFiles { .. }));
}

#[test]
fn only_undated_files_is_distinct_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("industry_x_latest.xlsx"), b"").unwrap();
    let err = SnapshotResolver::new(dir.path(), "xlsx")
        .resolve_latest("industry_x_")
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, DataError::NoTimestampedFiles { count: 1, .. }));
}
