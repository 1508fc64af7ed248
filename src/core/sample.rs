use std::collections::BTreeMap;

use crate::core::{
    Category, CategorySection, Finding, LibraryStats, ReportLinks, ReportSnapshot, ScanInfo,
    SeverityBucket, SeverityLevel,
};

/// Demo snapshot with one enabled, threshold-checked section per category.
pub fn sample_snapshot() -> ReportSnapshot {
    ReportSnapshot::default()
        .with_section(Category::StaticAnalysis, static_analysis_section())
        .with_section(Category::OpenSourceComponent, open_source_section())
}

fn static_analysis_section() -> CategorySection {
    let high = vec![
        Finding::static_analysis("SQL_Injection", 10),
        Finding::static_analysis("Reflected_XSS_All_Clients", 4),
        Finding::static_analysis("Command_Injection", 1),
    ];
    let medium = vec![
        Finding::static_analysis("CSRF", 7),
        Finding::static_analysis("Privacy_Violation", 3),
        Finding::static_analysis("Path_Traversal", 2),
    ];
    let low = vec![
        Finding::static_analysis("Information_Exposure_Through_an_Error_Message", 12),
        Finding::static_analysis("Improper_Resource_Shutdown_or_Release", 5),
        Finding::static_analysis("Use_Of_Hardcoded_Password", 1),
    ];

    CategorySection {
        enabled: true,
        thresholds_enabled: true,
        buckets: BTreeMap::from([
            (SeverityLevel::High, SeverityBucket::new(3, Some(0), high)),
            (SeverityLevel::Medium, SeverityBucket::new(3, Some(0), medium)),
            (SeverityLevel::Low, SeverityBucket::new(3, Some(1), low)),
        ]),
        links: ReportLinks {
            pdf: Some("reports/sast/summary.pdf".to_string()),
            html: Some("reports/sast/summary.html".to_string()),
            full_html: Some("reports/sast/full.html".to_string()),
            full_pdf: Some("reports/sast/full.pdf".to_string()),
            code_viewer: Some("reports/sast/viewer".to_string()),
        },
        scan_info: Some(ScanInfo {
            start_date: "28/06/2016".to_string(),
            end_date: "28/06/2016".to_string(),
            files_scanned: 2507,
            lines_of_code: Some(359),
        }),
        libraries: None,
    }
}

fn open_source_section() -> CategorySection {
    let high = vec![
        Finding::open_source("CVE-2015-7501", "09/11/2015", "commons-collections-3.2.1"),
        Finding::open_source("CVE-2016-3092", "04/07/2016", "commons-fileupload-1.3.1"),
        Finding::open_source("CVE-2014-0114", "30/04/2014", "commons-beanutils-1.8.3"),
    ];
    let medium = vec![
        Finding::open_source("CVE-2015-6420", "11/12/2015", "commons-collections-3.2.1"),
        Finding::open_source("CVE-2016-2510", "04/04/2016", "bsh-2.0b4"),
        Finding::open_source("CVE-2014-3625", "20/11/2014", "spring-webmvc-4.0.6"),
    ];
    let low = vec![
        Finding::open_source("CVE-2016-5007", "25/05/2016", "spring-security-4.0.4"),
        Finding::open_source("CVE-2015-3192", "08/07/2015", "spring-core-4.1.6"),
        Finding::open_source("CVE-2014-0050", "01/04/2014", "commons-fileupload-1.3"),
    ];

    CategorySection {
        enabled: true,
        thresholds_enabled: true,
        buckets: BTreeMap::from([
            (SeverityLevel::High, SeverityBucket::new(3, Some(1), high)),
            (SeverityLevel::Medium, SeverityBucket::new(3, Some(0), medium)),
            (SeverityLevel::Low, SeverityBucket::new(3, Some(1), low)),
        ]),
        links: ReportLinks {
            pdf: Some("reports/osa/summary.pdf".to_string()),
            html: Some("reports/osa/summary.html".to_string()),
            full_html: Some("reports/osa/full.html".to_string()),
            full_pdf: Some("reports/osa/full.pdf".to_string()),
            code_viewer: None,
        },
        scan_info: Some(ScanInfo {
            start_date: "28/07/2016".to_string(),
            end_date: "28/07/2016".to_string(),
            files_scanned: 3507,
            lines_of_code: None,
        }),
        libraries: Some(LibraryStats {
            vulnerable: 8,
            ok: 28,
        }),
    }
}
