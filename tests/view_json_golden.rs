use std::collections::BTreeMap;

use scansummary::core::{
    Category, CategorySection, Finding, ReportLinks, ReportSnapshot, SeverityBucket,
    SeverityLevel,
};
use scansummary::model::ReportModel;

#[test]
fn view_json_matches_golden() {
    let sast = CategorySection {
        enabled: true,
        thresholds_enabled: true,
        buckets: BTreeMap::from([
            (
                SeverityLevel::High,
                SeverityBucket::new(1, Some(0), vec![Finding::static_analysis("SQL_Injection", 2)]),
            ),
            (
                SeverityLevel::Medium,
                SeverityBucket::new(1, None, vec![Finding::static_analysis("CSRF", 1)]),
            ),
            (
                SeverityLevel::Low,
                SeverityBucket::new(
                    2,
                    Some(5),
                    vec![
                        Finding::static_analysis("Path_Traversal", 5),
                        Finding::static_analysis("Privacy_Violation", 1),
                    ],
                ),
            ),
        ]),
        links: ReportLinks {
            html: Some("reports/sast.html".to_string()),
            ..ReportLinks::default()
        },
        scan_info: None,
        libraries: None,
    };
    let osa = CategorySection {
        enabled: false,
        ..CategorySection::default()
    };
    let snapshot = ReportSnapshot::default()
        .with_section(Category::StaticAnalysis, sast)
        .with_section(Category::OpenSourceComponent, osa);

    let view = ReportModel::new(&snapshot).build_view().expect("build view");

    let actual = serde_json::to_value(&view).expect("serialize view");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/view.json")).expect("parse golden json");

    assert_eq!(actual, expected);
}
