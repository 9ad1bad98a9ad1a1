//! Shared fixtures: a small synthetic case export and a config pointing
//! at it inside a temp directory.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use waitlens::config::{parse_and_validate, AnalysisConfig};

pub const CASES_CSV: &str = "\
aidoc_site,algorithm,patient_class,aidoc_result,wait_time_minutes,study_acquisition_time,case_open_time
north,ich,emergency,True,12.0,2023-01-15 10:30,2023-01-15 10:42:10
north,ich,inpatient,True,8.5,2023-01-20 11:00,2023-01-20 11:08:30
south,pe,emergency,True,15.0,2023-02-01 09:15,2023-02-01 09:30:00
south,pe,inpatient,False,42.0,2023-02-11 14:00,2023-02-11 14:42:20
north,ich,emergency,False,55.5,2023-03-03 16:30,2023-03-03 17:25:45
south,pe,emergency,False,61.0,2023-03-09 08:45,2023-03-09 09:46:00
north,pe,inpatient,False,38.0,2023-01-28 12:10,2023-01-28 12:48:15
south,ich,emergency,True,9.5,2023-02-17 19:00,2023-02-17 19:09:25
north,ich,outpatient,False,,2023-03-21 10:00,2023-03-21 10:30:00
";

/// Write the fixture CSV under `dir` and build a config whose paths all
/// live inside `dir`.
pub fn fixture_config(dir: &Path) -> AnalysisConfig {
    let dataset = dir.join("cases.csv");
    fs::write(&dataset, CASES_CSV).unwrap();
    let plots = dir.join("plots");

    let contents = format!(
        r#"
[paths]
dataset = "{dataset}"
plots = "{plots}"

[columns]
site = "aidoc_site"
algorithm = "algorithm"
patient_class = "patient_class"
ai_result = "aidoc_result"
wait_minutes = "wait_time_minutes"
study_acquired = "study_acquisition_time"
case_opened = "case_open_time"

[labels]
acquired_format = "%Y-%m-%d %H:%M"
opened_format = "%Y-%m-%d %H:%M"
"#,
        dataset = dataset.display(),
        plots = plots.display(),
    );
    parse_and_validate(&contents).unwrap()
}

/// True when a plot error only reflects a missing system font, which
/// headless test environments may not provide.
pub fn is_font_problem(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("font") || lower.contains("glyph")
}
