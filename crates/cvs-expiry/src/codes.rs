//! # Fixed Code Sets
//!
//! The identifier sets that drive eligibility and strategy selection. These
//! are fixed by the certification rules and are not configurable per
//! deployment.
//!
//! | Set | Applies to | Effect |
//! |-----|------------|--------|
//! | [`EXPIRY_TEST_CODES`] | historical entries | only these codes count towards "most recent expiry" |
//! | [`COIF_TEST_TYPE_IDS`] | PSV | always the default one-year rule |
//! | [`FIRST_TEST_TYPE_IDS`] | HGV/TRL | first-test strategy |
//! | [`ANNUAL_TEST_TYPE_IDS`] | HGV/TRL | annual-test strategy when there is no history |
//!
//! The first-test and annual-test sets are disjoint.

/// Classification of a test type that issues a certificate with an expiry.
pub const ANNUAL_WITH_CERTIFICATE: &str = "Annual With Certificate";

/// Test codes whose historical expiry dates count towards the "most recent
/// expiry" lookup. Sorted and upper-case so lookups can binary search.
pub const EXPIRY_TEST_CODES: &[&str] = &[
    "AAL", "AAS", "AAT", "AAV", "ABL", "ABS", "ABT", "ABV",
    "ADL", "ADS", "ADT", "ADV", "AEL", "AES", "AET", "AEV",
    "AFL", "AFS", "AFT", "AFV", "AGL", "AGS", "AGT", "AGV",
    "AHL", "AHS", "AHT", "AHV", "AIL", "AIS", "AIT", "AIV",
    "AJL", "AJS", "AJT", "AJV", "AKL", "AKS", "AKT", "AKV",
    "ALL", "ALS", "ALT", "ALV", "AML", "AMS", "AMT", "AMV",
    "ANL", "ANS", "ANT", "ANV", "AOL", "AOS", "AOT", "AOV",
    "APL", "APS", "APT", "APV", "ARL", "ARS", "ART", "ARV",
    "ASL", "ASS", "AST", "ASV", "ATL", "ATS", "ATT", "ATV",
    "AUL", "AUS", "AUT", "AUV", "AVL", "AVS", "AVT", "AVV",
    "AWL", "AWS", "AWT", "AWV", "AXL", "AXS", "AXT", "AXV",
    "AYL", "AYS", "AYT", "AYV", "B2L", "B2S", "B2T", "B2V",
    "B3L", "B3S", "B3T", "B3V", "B4L", "B4S", "B4T", "B4V",
    "B5L", "B5S", "B5T", "B5V", "FFL", "FFS", "FFT", "FFV",
    "P1L", "P1S", "P1T", "P1V", "P2L", "P2S", "P2T", "P2V",
    "P3L", "P3S", "P3T", "P3V", "P4L", "P4S", "P4T", "P4V",
    "P5L", "P5S", "P5T", "P5V", "P6L", "P6S", "P6T", "P6V",
    "P7L", "P7S", "P7T", "P7V", "P8L", "P8S", "P8T", "P8V",
    "RFL", "RFS", "RFT", "RFV", "RGL", "RGS", "RGT", "RGV",
];

/// PSV Certificate of Initial Fitness test types.
pub const COIF_TEST_TYPE_IDS: &[&str] = &["142", "143", "175", "176"];

/// HGV/TRL first test and first-test retest types.
pub const FIRST_TEST_TYPE_IDS: &[&str] = &[
    "41", "65", "66", "67", "82", "83", "95", "103", "104", "119", "120",
];

/// HGV/TRL annual test and annual-test retest types.
pub const ANNUAL_TEST_TYPE_IDS: &[&str] = &[
    "40", "53", "54", "70", "76", "94", "98", "99", "107", "113",
];

/// Whether a historical test code counts towards the expiry lookup.
/// Comparison is case-insensitive.
pub fn is_expiry_test_code(code: &str) -> bool {
    let upper = code.trim().to_ascii_uppercase();
    EXPIRY_TEST_CODES.binary_search(&upper.as_str()).is_ok()
}

/// Whether a PSV test type is a COIF test.
pub fn is_coif(test_type_id: &str) -> bool {
    COIF_TEST_TYPE_IDS.contains(&test_type_id)
}

/// Whether an HGV/TRL test type is a first test or first-test retest.
pub fn is_first_test(test_type_id: &str) -> bool {
    FIRST_TEST_TYPE_IDS.contains(&test_type_id)
}

/// Whether an HGV/TRL test type is an annual test or annual-test retest.
pub fn is_annual_test(test_type_id: &str) -> bool {
    ANNUAL_TEST_TYPE_IDS.contains(&test_type_id)
}
