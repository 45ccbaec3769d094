use chrono::Utc;
use focusfriend_core::{run_scheduling_pass, Config, Database, Settings};

pub fn run(dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if dry_run {
        tracing::debug!("dry run requested on the command line");
        config.calendar.dry_run = true;
    }

    let mut db = Database::open()?;
    let settings = Settings::from_source(&db, &config.timezone()?)?;
    let report = run_scheduling_pass(Utc::now(), &config, &settings, &mut db)?;

    for (date, day) in &report.plan.days {
        match &day.error {
            Some(err) if day.is_skipped() => println!("{date}: skipped ({err})"),
            Some(err) => println!("{date}: no break ({err})"),
            None => {}
        }
    }
    let verb = if report.dry_run { "would create" } else { "created" };
    println!(
        "{verb} {} blocks, replacing {} ({} days skipped)",
        report.summary.created, report.summary.deleted, report.summary.skipped_days
    );
    Ok(())
}
