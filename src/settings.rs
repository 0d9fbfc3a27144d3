// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User display preferences.
//!
//! Settings never touch financial data. They are loaded once by the caller and
//! handed to every formatting function, so a change takes effect on the next
//! render without any cache to invalidate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "INR")]
    Inr,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "JPY")]
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Inr,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
        }
    }

    /// Numeral locale used to group digits.
    pub fn locale(&self) -> &'static str {
        match self {
            Currency::Inr => "en-IN",
            Currency::Usd => "en-US",
            Currency::Eur => "de-DE",
            Currency::Gbp => "en-GB",
            Currency::Jpy => "ja-JP",
        }
    }

    pub fn fraction_digits(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::Iso => "YYYY-MM-DD",
        }
    }
}

impl FromStr for DateFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYear),
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYear),
            "YYYY-MM-DD" => Ok(DateFormat::Iso),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12")]
    TwelveHour,
    #[serde(rename = "24")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12",
            TimeFormat::TwentyFourHour => "24",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12" | "12h" => Ok(TimeFormat::TwelveHour),
            "24" | "24h" => Ok(TimeFormat::TwentyFourHour),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

/// Absent fields in the stored blob take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub currency: Currency,
    pub date_format: DateFormat,
    pub time_format: TimeFormat,
    pub language: String,
    pub theme: Theme,
    pub compact_mode: bool,
    pub animations: bool,
    pub budget_alerts: bool,
    pub transaction_alerts: bool,
    pub monthly_reports: bool,
    pub push_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: Currency::default(),
            date_format: DateFormat::default(),
            time_format: TimeFormat::default(),
            language: "en".to_string(),
            theme: Theme::default(),
            compact_mode: false,
            animations: true,
            budget_alerts: true,
            transaction_alerts: false,
            monthly_reports: true,
            push_notifications: false,
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Reads a stored settings object field by field. A field that is
    /// unknown or fails to decode keeps its default; the rest still apply.
    pub fn from_stored(stored: &Map<String, Value>) -> Settings {
        let Ok(Value::Object(mut merged)) = serde_json::to_value(Settings::default()) else {
            return Settings::default();
        };
        for (key, value) in stored {
            if !merged.contains_key(key) {
                continue;
            }
            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            match serde_json::from_value::<Settings>(Value::Object(candidate.clone())) {
                Ok(_) => merged = candidate,
                Err(e) => warn!(key = %key, error = %e, "ignoring unreadable setting"),
            }
        }
        serde_json::from_value(Value::Object(merged)).unwrap_or_default()
    }

    /// Set one preference by its stored name (`dateFormat`, `date-format` and
    /// `date_format` are all accepted). Returns the stored name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&'static str, ValidationError> {
        let invalid = || ValidationError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        let field = match normalize_key(key).as_str() {
            "currency" => {
                self.currency = value.parse().map_err(|_| invalid())?;
                "currency"
            }
            "dateformat" => {
                self.date_format = value.parse().map_err(|_| invalid())?;
                "dateFormat"
            }
            "timeformat" => {
                self.time_format = value.parse().map_err(|_| invalid())?;
                "timeFormat"
            }
            "theme" => {
                self.theme = value.parse().map_err(|_| invalid())?;
                "theme"
            }
            "language" => {
                let lang = value.trim();
                if lang.is_empty() {
                    return Err(invalid());
                }
                self.language = lang.to_string();
                "language"
            }
            "compactmode" => {
                self.compact_mode = parse_flag(value).ok_or_else(invalid)?;
                "compactMode"
            }
            "animations" => {
                self.animations = parse_flag(value).ok_or_else(invalid)?;
                "animations"
            }
            "budgetalerts" => {
                self.budget_alerts = parse_flag(value).ok_or_else(invalid)?;
                "budgetAlerts"
            }
            "transactionalerts" => {
                self.transaction_alerts = parse_flag(value).ok_or_else(invalid)?;
                "transactionAlerts"
            }
            "monthlyreports" => {
                self.monthly_reports = parse_flag(value).ok_or_else(invalid)?;
                "monthlyReports"
            }
            "pushnotifications" => {
                self.push_notifications = parse_flag(value).ok_or_else(invalid)?;
                "pushNotifications"
            }
            _ => return Err(ValidationError::UnknownSetting(key.to_string())),
        };
        Ok(field)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.code().to_string()),
            ("dateFormat", self.date_format.as_str().to_string()),
            ("timeFormat", self.time_format.as_str().to_string()),
            ("language", self.language.clone()),
            ("theme", self.theme.as_str().to_string()),
            ("compactMode", self.compact_mode.to_string()),
            ("animations", self.animations.to_string()),
            ("budgetAlerts", self.budget_alerts.to_string()),
            ("transactionAlerts", self.transaction_alerts.to_string()),
            ("monthlyReports", self.monthly_reports.to_string()),
            ("pushNotifications", self.push_notifications.to_string()),
        ]
    }
}
