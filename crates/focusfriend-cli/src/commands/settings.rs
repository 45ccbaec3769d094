use clap::Subcommand;
use focusfriend_core::settings::{parse_hour, SETTINGS_KEYS};
use chrono_tz::Tz;
use focusfriend_core::{Config, Database, Settings};
use serde::Serialize;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the stored and effective value of a setting
    Get {
        /// Setting key (e.g. "workday_start_hour")
        key: String,
    },
    /// Store a setting
    Set {
        /// Setting key
        key: String,
        /// Hour of day ("9", "09:30" or a timestamp)
        value: String,
    },
    /// Remove a stored setting, reverting to its default
    Unset {
        /// Setting key
        key: String,
    },
    /// List all settings as JSON
    List,
}

#[derive(Serialize)]
struct SettingRow {
    key: &'static str,
    stored: Option<String>,
    effective: u8,
}

fn check_key(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    if SETTINGS_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(format!("unknown setting: {key} (expected one of {})", SETTINGS_KEYS.join(", ")).into())
    }
}

fn rows(db: &Database, timezone: &Tz) -> Result<Vec<SettingRow>, Box<dyn std::error::Error>> {
    let effective = Settings::from_source(db, timezone)?;
    effective
        .entries()
        .into_iter()
        .map(|(key, hour)| -> Result<SettingRow, Box<dyn std::error::Error>> {
            Ok(SettingRow {
                key,
                stored: db.setting_get(key)?,
                effective: hour,
            })
        })
        .collect()
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let timezone = Config::load()?.timezone()?;
    let db = Database::open()?;
    match action {
        SettingsAction::Get { key } => {
            check_key(&key)?;
            let row = rows(&db, &timezone)?
                .into_iter()
                .find(|row| row.key == key)
                .ok_or_else(|| format!("unknown setting: {key}"))?;
            println!("{}", row.effective);
        }
        SettingsAction::Set { key, value } => {
            check_key(&key)?;
            if parse_hour(&value, &timezone).is_none() {
                return Err(format!("'{value}' is not an hour of day").into());
            }
            db.setting_set(&key, &value)?;
            println!("ok");
        }
        SettingsAction::Unset { key } => {
            check_key(&key)?;
            if db.setting_unset(&key)? {
                println!("{key} reset to default");
            } else {
                println!("{key} was not set");
            }
        }
        SettingsAction::List => {
            println!("{}", serde_json::to_string_pretty(&rows(&db, &timezone)?)?);
        }
    }
    Ok(())
}
