use std::fs;
use tempfile::TempDir;

use kanjidb_analysis::{sort_rows, to_csv, write_atomic, ComponentAnalyzer, SortDirection, SortKey};
use kanjidb_core::CharacterStore;
use kanjidb_sources::parse_into;

const KANJIVG: &str = r#"<kanjivg>
<kanji id="kvg:kanji_04f11"><g kvg:element="休"><g kvg:element="亻"/><g kvg:element="木"/></g></kanji>
<kanji id="kvg:kanji_06797"><g kvg:element="林"><g kvg:element="木"/><g kvg:element="木"/></g></kanji>
<kanji id="kvg:kanji_068ee"><g kvg:element="森"><g kvg:element="木"/><g kvg:element="林"><g kvg:element="木"/><g kvg:element="木"/></g></g></kanji>
<kanji id="kvg:kanji_04f53"><g kvg:element="体"><g kvg:element="亻"/><g kvg:element="本"><g kvg:element="木"/></g></g></kanji>
</kanjivg>"#;

const KANJIDIC: &str = r#"<kanjidic2>
<character><literal>休</literal><misc><freq>642</freq></misc><reading_meaning><rmgroup><reading r_type="ja_on">キュウ</reading><meaning>rest</meaning></rmgroup></reading_meaning></character>
<character><literal>林</literal><misc><freq>1179</freq></misc><reading_meaning><rmgroup><reading r_type="ja_on">リン</reading><meaning>grove</meaning></rmgroup></reading_meaning></character>
<character><literal>森</literal><misc><freq>609</freq></misc><reading_meaning><rmgroup><reading r_type="ja_on">シン</reading><meaning>forest</meaning></rmgroup></reading_meaning></character>
<character><literal>木</literal><misc><freq>317</freq></misc><reading_meaning><rmgroup><reading r_type="ja_on">ボク</reading><reading r_type="ja_on">モク</reading><meaning>tree</meaning></rmgroup></reading_meaning></character>
</kanjidic2>"#;

fn loaded_store() -> CharacterStore {
    let mut store = CharacterStore::new();
    parse_into(&mut store, KANJIVG, "KANJI_VG").expect("kanjivg");
    parse_into(&mut store, KANJIDIC, "KANJI_DIC").expect("kanjidic");
    store
}

#[test]
fn component_rows_follow_top_tally() {
    let store = loaded_store();
    let analyzer = ComponentAnalyzer::new(&store);

    // 木 appears in 休 林 森 体 and the seeded 亲; 体 has no KANJIDIC record
    let tree = analyzer.analyze("木");
    assert_eq!(tree.missing_readings.iter().collect::<Vec<_>>(), vec!["体"]);
    assert_eq!(tree.rows.len(), 1);
    let row = &tree.rows[0];
    assert_eq!(row.reading, "シン");
    assert_eq!(row.kanji_in_series, vec!["亲", "森"]);
    assert!(row.kanji_with_extra_readings.is_empty());
    assert_eq!(row.frequency, Some(317));
    assert!((row.coverage - 0.4).abs() < 1e-12);

    let person = analyzer.analyze("亻");
    assert_eq!(person.rows.len(), 1);
    assert_eq!(person.rows[0].reading, "キュウ");
    assert_eq!(person.rows[0].frequency, None);
    assert!((person.rows[0].coverage - 0.5).abs() < 1e-12);
}

#[test]
fn full_report_exports_to_csv() {
    let store = loaded_store();
    let mut report = ComponentAnalyzer::new(&store).analyze_all();
    // 亻 木 林 本 and the seeded 㐱/亲 components
    assert!(report.components >= 4);
    assert!(report.missing_readings.contains("体"));

    sort_rows(&mut report.rows, SortKey::Coverage, SortDirection::Descending);
    let coverages: Vec<f64> = report.rows.iter().map(|r| r.coverage).collect();
    assert!(coverages.windows(2).all(|w| w[0] >= w[1]));

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("reports").join("table.csv");
    let csv = to_csv(&report.rows, 2).expect("csv");
    write_atomic(&out, &csv).expect("write");
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), report.rows.len() + 1);
    assert!(written.contains("林,1179,1,森,シン,100%,"));
}
