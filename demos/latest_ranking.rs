use covid_data::models::prefs_js;
use covid_data::models::validate::validate_artifact;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "crates/covid_data/tests/fixtures/prefs.js".to_string());

    let artifact = prefs_js::read(&path)?;
    println!("📅 Last update: {}", artifact.data.last_update);

    for (rank, (name, patients, mortality)) in artifact.latest.entries().take(10).enumerate() {
        println!("{:>2}. {} {} ({} deaths)", rank + 1, name, patients, mortality);
    }

    let report = validate_artifact(&artifact.data, &artifact.latest);
    if report.is_clean() {
        println!("✅ No violations");
    } else {
        println!("⚠️  {} violations:", report.len());
        for violation in report.iter() {
            println!("  - {}", violation);
        }
    }

    Ok(())
}
