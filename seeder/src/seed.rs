use async_trait::async_trait;
use colored::*;
use sea_orm::DatabaseConnection;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

const STATUS_COLUMN: usize = 80;

/// Outcome counts for one seeder run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl SeedReport {
    pub fn record<T, E>(&mut self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.inserted += 1,
            Err(_) => self.skipped += 1,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

impl AddAssign for SeedReport {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
    }
}

/// A fixed batch of sample records.
///
/// Implementations log and skip records that fail; a seeder never aborts the run.
#[async_trait]
pub trait Seeder: Send + Sync {
    /// Plural noun used in log lines, e.g. `users`.
    fn name(&self) -> &'static str;

    async fn seed(&self, db: &DatabaseConnection) -> SeedReport;
}

pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, db: &DatabaseConnection) -> SeedReport {
    let name = seeder.name();
    tracing::info!("seeding {name}...");

    let start = Instant::now();
    let report = seeder.seed(db).await;

    println!("{}", status_line(name, &report, start.elapsed()));
    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "done seeding {name}"
    );

    report
}

fn status_line(name: &str, report: &SeedReport, elapsed: Duration) -> String {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));

    let outcome = if report.is_clean() {
        "done".green()
    } else {
        "done".yellow()
    };
    let counts = format!("{} inserted, {} skipped", report.inserted, report.skipped);
    let time_str = format!("({:.2?})", elapsed).dimmed();

    format!("{base_msg}{dots} {outcome} {counts} {time_str}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_outcomes() {
        let mut report = SeedReport::default();
        report.record::<(), ()>(&Ok(()));
        report.record::<(), ()>(&Err(()));
        report.record::<(), ()>(&Ok(()));

        assert_eq!(report, SeedReport { inserted: 2, skipped: 1 });
        assert!(!report.is_clean());
    }

    #[test]
    fn reports_add_up() {
        let mut total = SeedReport { inserted: 3, skipped: 0 };
        total += SeedReport { inserted: 10, skipped: 2 };
        assert_eq!(total, SeedReport { inserted: 13, skipped: 2 });
    }

    #[test]
    fn status_line_pads_to_column() {
        colored::control::set_override(false);
        let line = status_line(
            "movies",
            &SeedReport { inserted: 10, skipped: 0 },
            Duration::from_millis(5),
        );

        assert!(line.starts_with("Seeding movies...."));
        assert!(line.contains(" done 10 inserted, 0 skipped ("));
        assert_eq!(line.find(" done"), Some(STATUS_COLUMN));
    }
}
