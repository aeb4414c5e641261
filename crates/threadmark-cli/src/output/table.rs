use threadmark_core::model::StyleReference;
use threadmark_core::validate::{Severity, Verdict};
use threadmark_core::TagReport;

pub fn print_report(report: &TagReport) {
    if report.fell_back() {
        println!(
            "Tier: {} (fell back from {})\n",
            report.resolved_tier, report.requested_tier
        );
    } else {
        println!("Tier: {}\n", report.resolved_tier);
    }

    if report.tags.is_empty() {
        println!("  No tags extracted.");
    } else {
        let max_name = report.tags.iter().map(|t| t.name.len()).max().unwrap_or(10);
        for (i, tag) in report.tags.iter().enumerate() {
            let descriptors = if tag.descriptors.is_empty() {
                String::new()
            } else {
                format!("  [{}]", tag.descriptors.join(", "))
            };
            println!(
                "  {:>2}. {:<width$}  {:<11} {:>6}  {}{}",
                i + 1,
                tag.name,
                tag.category.to_string(),
                tag.confidence.round_dp(4),
                tag.source.label(),
                descriptors,
                width = max_name,
            );
        }
    }

    if !report.rejections.is_empty() {
        println!("\n  Rejected ({}):", report.rejections.len());
        for rejection in &report.rejections {
            let rules: Vec<String> = rejection
                .verdict
                .hard_issues()
                .map(|issue| issue.rule.to_string())
                .collect();
            println!(
                "    {} ({}): {}",
                rejection.name,
                rejection.verdict.final_confidence.round_dp(4),
                rules.join(", ")
            );
        }
    }

    if !report.source_failures.is_empty() {
        println!("\n  Source failures:");
        for failure in &report.source_failures {
            println!("    {}: {}", failure.source, failure.reason);
        }
    }
}

pub fn print_verdict(name: &str, references: &[StyleReference], verdict: &Verdict) {
    let status = if verdict.is_valid { "VALID" } else { "REJECTED" };
    println!("=== {name} ===\n");
    println!(
        "  {}  final confidence {}\n",
        status,
        verdict.final_confidence.round_dp(4)
    );

    if references.is_empty() {
        println!("  No style references found.");
    } else {
        println!("  Style references:");
        for r in references {
            println!("    {} ({})  \"{}\"", r.item, r.confidence, r.context);
        }
    }

    if !verdict.reasons.is_empty() {
        println!("\n  Reasons:");
        for issue in &verdict.reasons {
            let marker = match issue.severity {
                Severity::Hard => "x",
                Severity::Soft => "~",
            };
            println!("    {} {:<20} {}", marker, issue.rule.to_string(), issue.message);
        }
    }
}
