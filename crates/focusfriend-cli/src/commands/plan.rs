use chrono::{NaiveDate, Utc};
use focusfriend_core::timeline::local_date;
use focusfriend_core::{Config, Database, DayPlanner, Settings, WeekPlanner};

pub fn run(date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let planner_config = config.planner_config()?;

    let today = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}': {e}"))?,
        None => local_date(&planner_config.timezone, Utc::now()),
    };

    let db = Database::open()?;
    let settings = Settings::from_source(&db, &planner_config.timezone)?;
    let planner = WeekPlanner::new(DayPlanner::with_config(planner_config));
    let plan = planner.plan_week(&settings, today, &db)?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
