//! Console report: dataset profile, descriptive statistics, and the
//! hypothesis-test outcome.

use crate::core::Dataset;
use crate::stats::{SummaryStats, WelchTTest};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

const HEAD_ROWS: usize = 5;

pub fn print_banner(title: &str) {
    println!();
    println!("{}", "═══════════════════════════════════════════".cyan());
    println!("{}", format!("   {title}").bold().cyan());
    println!("{}", "═══════════════════════════════════════════".cyan());
    println!();
}

/// First look at the dataset: head, dtypes, shape, duplicates, missing.
pub fn print_profile(dataset: &Dataset) {
    print_banner("DATASET PROFILE");
    print_head(dataset);

    println!("{}", "Column types:".bold());
    for column in dataset.columns() {
        println!("  {:<36} {}", column.name, column.dtype().to_string().yellow());
    }
    println!();

    let (rows, cols) = dataset.shape();
    println!("Shape: {} rows x {} columns", rows, cols);

    let duplicates = dataset.duplicate_row_count();
    let duplicates_text = if duplicates == 0 {
        duplicates.to_string().green()
    } else {
        duplicates.to_string().yellow()
    };
    println!("Duplicated rows: {duplicates_text}");
    println!();

    println!("{}", "Missing values per column:".bold());
    for (name, missing) in dataset.missing_counts() {
        let count = if missing == 0 {
            missing.to_string().green()
        } else {
            missing.to_string().red()
        };
        println!("  {name:<36} {count}");
    }
    println!();
}

/// First rows of the table, missing cells shown as NA.
pub fn print_head(dataset: &Dataset) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(dataset.column_names().collect::<Vec<_>>());
    for row in 0..dataset.n_rows().min(HEAD_ROWS) {
        table.add_row(
            dataset
                .columns()
                .iter()
                .map(|c| c.cell_display(row))
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    println!();
}

fn describe_row(label: &str, stats: &SummaryStats) -> Vec<String> {
    vec![
        label.to_string(),
        stats.count.to_string(),
        format!("{:.2}", stats.mean),
        format!("{:.2}", stats.std),
        format!("{:.2}", stats.min),
        format!("{:.2}", stats.q1),
        format!("{:.2}", stats.median),
        format!("{:.2}", stats.q3),
        format!("{:.2}", stats.max),
    ]
}

const DESCRIBE_HEADER: [&str; 9] = [
    "", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Summary statistics for one numeric column.
pub fn print_describe(column: &str, stats: &SummaryStats) {
    print_banner("SUMMARY STATISTICS");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(DESCRIBE_HEADER.to_vec());
    table.add_row(describe_row(column, stats));
    println!("{table}");
    println!();
}

/// Summary statistics per category of a grouping column.
pub fn print_grouped_describe(group_column: &str, groups: &[(String, SummaryStats)]) {
    println!(
        "{} {}",
        "Grouped by".bold(),
        group_column.bold().yellow()
    );
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(DESCRIBE_HEADER.to_vec());
    for (label, stats) in groups {
        table.add_row(describe_row(label, stats));
    }
    println!("{table}");
    println!();
}

/// Welch's t-test outcome, with the conventional 0.05 significance cue.
pub fn print_test_outcome(
    column: &str,
    group_a: &str,
    group_b: &str,
    result: &WelchTTest,
) {
    print_banner("WELCH'S T-TEST");
    println!(
        "Comparing `{}` between {} and {} cases",
        column,
        group_a.bold(),
        group_b.bold()
    );
    println!("  t statistic: {:>10.4}", result.statistic);
    println!("  df:          {:>10.2}", result.df);
    let p_text = format!("{:.3e}", result.p_value);
    let p_colored = if result.p_value < 0.05 {
        p_text.green().bold()
    } else {
        p_text.yellow()
    };
    println!("  p-value:     {:>10}", p_colored);
    if result.p_value < 0.05 {
        println!(
            "  {}",
            "Significant difference in means at the 0.05 level".green()
        );
    } else {
        println!(
            "  {}",
            "No significant difference in means at the 0.05 level".yellow()
        );
    }
    println!();
}
