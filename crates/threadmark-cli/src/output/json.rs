use threadmark_core::{TagReport, ThreadmarkError};

pub fn print_report(report: &TagReport) -> Result<(), ThreadmarkError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

pub fn print_value(value: &serde_json::Value) -> Result<(), ThreadmarkError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
