//! Shared fixtures for the comprehensive suite

use chrono::{DateTime, TimeZone, Utc};
use memrepo::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct Cat {
    pub id: i64,
    pub name: Option<String>,
    pub weight: f64,
    pub birth_date: Option<DateTime<Utc>>,
}

impl Entity for Cat {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn schema() -> Schema<Self> {
        Schema::builder()
            .field_with_setter(
                "id",
                |c: &Cat| Value::from(c.id),
                |c: &mut Cat, v| {
                    c.id = v.try_into()?;
                    Ok(())
                },
            )
            .field_with_setter(
                "name",
                |c: &Cat| Value::from(c.name.clone()),
                |c: &mut Cat, v| {
                    c.name = v.into_option()?;
                    Ok(())
                },
            )
            .field_with_setter(
                "weight",
                |c: &Cat| Value::from(c.weight),
                |c: &mut Cat, v| {
                    c.weight = v.try_into()?;
                    Ok(())
                },
            )
            .field("birth_date", |c: &Cat| Value::from(c.birth_date))
            .build()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn cat(id: i64, name: Option<&str>, weight: f64, birth_date: Option<DateTime<Utc>>) -> Cat {
    Cat {
        id,
        name: name.map(str::to_string),
        weight,
        birth_date,
    }
}

/// Six cats: one without a name, two without a birth date
pub fn sample_cats() -> Vec<Cat> {
    vec![
        cat(1, Some("Vasya"), 12.0, Some(date(1999, 6, 17))),
        cat(2, Some("Alisa"), 2.0, Some(date(2003, 2, 1))),
        cat(3, Some("Murka"), 4.5, Some(date(2010, 11, 30))),
        cat(4, Some("Qweqwe"), 6.0, None),
        cat(5, Some("Octocat"), 4.5, Some(date(2015, 4, 3))),
        cat(6, None, 3.0, None),
    ]
}

pub fn sample_repo(policy: CopyPolicy) -> InMemoryRepository<Cat> {
    let repo = InMemoryRepository::with_options(RepositoryOptions::new().copy_policy(policy));
    repo.ingest_all(sample_cats(), false);
    repo
}

pub fn ids(cats: &[std::sync::Arc<Cat>]) -> Vec<i64> {
    cats.iter().map(|c| c.id).collect()
}

/// Install a test subscriber once; repeated calls are harmless
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
