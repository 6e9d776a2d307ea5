//! Demo schema bootstrap.
//!
//! Creates the `cust`, `sal` and `ord` tables and loads their fixed sample rows.
//! The `account` table is not touched here; it is expected to exist already.

use crate::domain::error::StoreError;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cust (
    cnum INTEGER NOT NULL,
    cname VARCHAR(10) NOT NULL,
    city VARCHAR(10) NOT NULL,
    rating INTEGER NOT NULL,
    snum INTEGER,
    PRIMARY KEY (cnum)
);

CREATE TABLE IF NOT EXISTS sal (
    snum INTEGER NOT NULL,
    sname VARCHAR(10) NOT NULL,
    city VARCHAR(10) NOT NULL,
    comm NUMERIC(7,2) NOT NULL,
    PRIMARY KEY (snum)
);

CREATE TABLE IF NOT EXISTS ord (
    onum INTEGER NOT NULL,
    amt NUMERIC(7,2) NOT NULL,
    odate DATE NOT NULL,
    cnum INTEGER,
    snum INTEGER,
    PRIMARY KEY (onum)
);
"#;

/// Seed rows, one statement per row, in load order.
pub const SEED_STATEMENTS: &[&str] = &[
    "INSERT INTO sal (snum, sname, city, comm) VALUES (1001, 'Peel', 'London', 0.12)",
    "INSERT INTO sal (snum, sname, city, comm) VALUES (1002, 'Serres', 'San Jose', 0.13)",
    "INSERT INTO sal (snum, sname, city, comm) VALUES (1004, 'Motica', 'London', 0.11)",
    "INSERT INTO sal (snum, sname, city, comm) VALUES (1007, 'Rifkin', 'Barcelona', 0.15)",
    "INSERT INTO sal (snum, sname, city, comm) VALUES (1003, 'Axelrod', 'New York', 0.10)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2001, 'Hoffman', 'London', 100, 1001)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2002, 'Giovanni', 'Rome', 200, 1003)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2003, 'Liu', 'San Jose', 200, 1002)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2004, 'Grass', 'Berlin', 300, 1002)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2006, 'Clemens', 'London', 100, 1001)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2008, 'Cisneros', 'San Jose', 300, 1007)",
    "INSERT INTO cust (cnum, cname, city, rating, snum) VALUES (2007, 'Pereira', 'Rome', 100, 1004)",
    "INSERT INTO ord VALUES (3001, 18.69, '2022-08-03', 2008, 1007)",
    "INSERT INTO ord VALUES (3003, 767.19, '2022-08-03', 2001, 1001)",
    "INSERT INTO ord VALUES (3002, 1900.10, '2022-08-03', 2007, 1004)",
    "INSERT INTO ord VALUES (3005, 5160.45, '2022-08-03', 2003, 1002)",
    "INSERT INTO ord VALUES (3006, 1098.16, '2022-08-03', 2008, 1007)",
    "INSERT INTO ord VALUES (3009, 1713.23, '2022-08-04', 2002, 1003)",
    "INSERT INTO ord VALUES (3007, 75.75, '2022-08-04', 2004, 1002)",
    "INSERT INTO ord VALUES (3008, 4723.00, '2022-08-05', 2006, 1001)",
    "INSERT INTO ord VALUES (3010, 1309.95, '2022-08-06', 2004, 1002)",
    "INSERT INTO ord VALUES (3011, 9891.88, '2022-08-06', 2006, 1001)",
];

/// How seed inserts treat rows whose key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Plain inserts. A second run fails on the first duplicate key.
    #[default]
    Strict,
    /// `ON CONFLICT DO NOTHING`; existing rows are counted as skipped.
    SkipExisting,
}

impl SeedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPolicy::Strict => "strict",
            SeedPolicy::SkipExisting => "skip-existing",
        }
    }

    fn statement<'a>(&self, insert: &'a str) -> Cow<'a, str> {
        match self {
            SeedPolicy::Strict => Cow::Borrowed(insert),
            SeedPolicy::SkipExisting => Cow::Owned(format!("{} ON CONFLICT DO NOTHING", insert)),
        }
    }
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SeedPolicy::Strict),
            "skip-existing" | "skip_existing" => Ok(SeedPolicy::SkipExisting),
            other => Err(format!("unknown seed policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: u64,
    pub skipped: u64,
}

/// Creates the demo tables and loads the seed rows.
///
/// Table creation is idempotent. Seeding under [`SeedPolicy::Strict`] is not:
/// rerunning against a seeded database returns the driver's unique-violation
/// error, and rows inserted before the failure stay committed.
#[instrument(skip(pool))]
pub async fn init(pool: &PgPool, policy: SeedPolicy) -> Result<SeedReport, StoreError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    debug!("Demo tables present");

    let mut report = SeedReport::default();
    for insert in SEED_STATEMENTS {
        let statement = policy.statement(insert);
        let result = sqlx::query(&statement).execute(pool).await?;
        if result.rows_affected() == 0 {
            report.skipped += 1;
        } else {
            report.inserted += result.rows_affected();
        }
    }

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "Demo data seeded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_for(table: &str) -> usize {
        let prefix = format!("INSERT INTO {} ", table);
        SEED_STATEMENTS
            .iter()
            .filter(|s| s.starts_with(&prefix))
            .count()
    }

    #[test]
    fn test_seed_row_counts() {
        assert_eq!(count_for("sal"), 5);
        assert_eq!(count_for("cust"), 7);
        assert_eq!(count_for("ord"), 10);
        assert_eq!(SEED_STATEMENTS.len(), 22);
    }

    #[test]
    fn test_schema_does_not_create_account_table() {
        assert!(!SCHEMA.to_lowercase().contains("account"));
        assert_eq!(SCHEMA.matches("CREATE TABLE IF NOT EXISTS").count(), 3);
    }

    #[test]
    fn test_strict_policy_keeps_statement() {
        let insert = SEED_STATEMENTS[0];
        assert_eq!(SeedPolicy::Strict.statement(insert), insert);
    }

    #[test]
    fn test_skip_existing_appends_conflict_clause() {
        let statement = SeedPolicy::SkipExisting.statement(SEED_STATEMENTS[12]);
        assert!(statement.starts_with("INSERT INTO ord VALUES (3001"));
        assert!(statement.ends_with(" ON CONFLICT DO NOTHING"));
    }

    #[test]
    fn test_seed_policy_parsing() {
        assert_eq!("strict".parse::<SeedPolicy>(), Ok(SeedPolicy::Strict));
        assert_eq!(
            "Skip-Existing".parse::<SeedPolicy>(),
            Ok(SeedPolicy::SkipExisting)
        );
        assert_eq!(
            "skip_existing".parse::<SeedPolicy>(),
            Ok(SeedPolicy::SkipExisting)
        );
        assert!("upsert".parse::<SeedPolicy>().is_err());
        assert_eq!(SeedPolicy::default(), SeedPolicy::Strict);
    }

    #[test]
    fn test_seed_policy_display_round_trips() {
        for policy in [SeedPolicy::Strict, SeedPolicy::SkipExisting] {
            assert_eq!(policy.to_string().parse::<SeedPolicy>(), Ok(policy));
        }
    }
}
