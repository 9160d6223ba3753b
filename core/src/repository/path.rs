use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const FORBIDDEN: [char; 5] = ['.', '#', '$', '[', ']'];

/// A `/`-separated location inside the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn is_ancestor_of(&self, other: &StorePath) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// True when a write at one path changes the value seen at the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }

    // users/{uid}
    fn user(uid: &str) -> Result<Self> {
        Self::root().child("users")?.child(uid)
    }

    pub fn user_config(uid: &str) -> Result<Self> {
        Self::user(uid)?.child("config")
    }

    pub fn user_price(uid: &str) -> Result<Self> {
        Self::user_config(uid)?.child("precoMarmita")
    }

    pub fn user_price_snapshot(uid: &str, day: NaiveDate) -> Result<Self> {
        Self::user_config(uid)?
            .child("historico")?
            .child(&day.format("%Y-%m-%d").to_string())
    }

    pub fn user_records(uid: &str) -> Result<Self> {
        Self::user(uid)?.child("registros")
    }

    pub fn user_record(uid: &str, day: NaiveDate) -> Result<Self> {
        Self::user_records(uid)?.child(&day.format("%Y-%m-%d").to_string())
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(anyhow!("Empty path segment"));
    }
    if segment.contains('/') || segment.contains(&FORBIDDEN[..]) {
        return Err(anyhow!("Invalid character in path segment '{}'", segment));
    }
    Ok(())
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for StorePath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut path = StorePath::root();
        for segment in s.trim_matches('/').split('/').filter(|seg| !seg.is_empty()) {
            path = path.child(segment)?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(StorePath::user_config("abc").unwrap().to_string(), "users/abc/config");
        assert_eq!(StorePath::user_record("abc", day).unwrap().to_string(), "users/abc/registros/2024-03-01");
        assert_eq!(
            StorePath::user_price_snapshot("abc", day).unwrap().to_string(),
            "users/abc/config/historico/2024-03-01"
        );
    }

    #[test]
    fn test_invalid_segments() {
        assert!(StorePath::root().child("").is_err());
        assert!(StorePath::root().child("a.b").is_err());
        assert!(StorePath::root().child("a$").is_err());
        assert!("users/a#b".parse::<StorePath>().is_err());
        assert!(StorePath::user_config("bad/uid").is_err());
    }

    #[test]
    fn test_overlaps() {
        let records: StorePath = "users/u/registros".parse().unwrap();
        let record: StorePath = "users/u/registros/2024-03-01".parse().unwrap();
        let config: StorePath = "users/u/config".parse().unwrap();

        assert!(records.overlaps(&record));
        assert!(record.overlaps(&records));
        assert!(StorePath::root().overlaps(&config));
        assert!(!records.overlaps(&config));
    }
}
