use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::Subcommand;
use focusfriend_core::timeline::{local_datetime, local_day};
use focusfriend_core::{Config, Database, EntryId, EventStatus, TimeInterval};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a commitment to the local calendar
    Add {
        /// Event title
        title: String,
        /// Start ("YYYY-MM-DD HH:MM" in the configured zone, or RFC 3339)
        #[arg(long)]
        start: String,
        /// End, same formats as --start
        #[arg(long, conflicts_with = "minutes")]
        end: Option<String>,
        /// Duration in minutes, instead of --end
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// List calendar entries
    List {
        /// Only entries on this local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an entry as declined so planning ignores it
    Decline {
        /// Entry ID
        id: String,
    },
    /// Delete an entry
    Remove {
        /// Entry ID
        id: String,
    },
}

fn parse_instant(tz: &Tz, raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("invalid time '{raw}': {e}"))?;
    Ok(local_datetime(tz, naive))
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tz = Config::load()?.timezone()?;
    match action {
        EventAction::Add {
            title,
            start,
            end,
            minutes,
        } => {
            let start = parse_instant(&tz, &start)?;
            let end = match (end, minutes) {
                (Some(end), _) => parse_instant(&tz, &end)?,
                (None, Some(minutes)) => start + Duration::minutes(minutes),
                (None, None) => return Err("either --end or --minutes is required".into()),
            };
            let id = db.add_event(&title, &TimeInterval::new(start, end)?)?;
            println!("{id}");
        }
        EventAction::List { date, json } => {
            let window = match date {
                Some(raw) => {
                    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|e| format!("invalid date '{raw}': {e}"))?;
                    let (start, end) = local_day(&tz, date);
                    Some(TimeInterval::new(start, end)?)
                }
                None => None,
            };
            let events = db.list_events(window.as_ref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events.");
            } else {
                for event in &events {
                    let status = match event.status {
                        EventStatus::Declined => " [declined]",
                        EventStatus::Accepted => "",
                    };
                    println!(
                        "{}  {} - {}  {}{}",
                        event.id,
                        event.interval.start().with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                        event.interval.end().with_timezone(&tz).format("%H:%M"),
                        event.title,
                        status
                    );
                }
            }
        }
        EventAction::Decline { id } => {
            let id = EntryId::from(id.as_str());
            if !db.set_event_status(&id, EventStatus::Declined)? {
                return Err(format!("event not found: {id}").into());
            }
            println!("declined {id}");
        }
        EventAction::Remove { id } => {
            let id = EntryId::from(id.as_str());
            if !db.remove_event(&id)? {
                return Err(format!("event not found: {id}").into());
            }
            println!("removed {id}");
        }
    }
    Ok(())
}
