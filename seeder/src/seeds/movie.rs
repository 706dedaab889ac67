use async_trait::async_trait;
use db::models::movie;
use sea_orm::{DatabaseConnection, DbErr};

use crate::seed::{SeedReport, Seeder};

#[derive(Debug, Clone, Copy)]
pub struct MovieSeed {
    pub title: &'static str,
    pub year: i32,
    /// Minutes.
    pub runtime: i32,
    pub genres: &'static [&'static str],
}

const LOTR_GENRES: &[&str] = &["Adventure", "Fantasy", "Action"];

pub const MOVIES: [MovieSeed; 10] = [
    MovieSeed {
        title: "The Lord of the Rings: The Fellowship of the Ring",
        year: 2001,
        runtime: 178,
        genres: LOTR_GENRES,
    },
    MovieSeed {
        title: "The Lord of the Rings: The Two Towers",
        year: 2002,
        runtime: 179,
        genres: LOTR_GENRES,
    },
    MovieSeed {
        title: "The Lord of the Rings: The Return of the King",
        year: 2003,
        runtime: 201,
        genres: LOTR_GENRES,
    },
    MovieSeed {
        title: "Inception",
        year: 2010,
        runtime: 148,
        genres: &["Action", "Sci-Fi", "Thriller"],
    },
    MovieSeed {
        title: "The Shawshank Redemption",
        year: 1994,
        runtime: 142,
        genres: &["Drama"],
    },
    MovieSeed {
        title: "Pulp Fiction",
        year: 1994,
        runtime: 154,
        genres: &["Crime", "Drama"],
    },
    MovieSeed {
        title: "The Dark Knight",
        year: 2008,
        runtime: 152,
        genres: &["Action", "Crime", "Drama"],
    },
    MovieSeed {
        title: "Forrest Gump",
        year: 1994,
        runtime: 142,
        genres: &["Drama", "Romance"],
    },
    MovieSeed {
        title: "The Matrix",
        year: 1999,
        runtime: 136,
        genres: &["Action", "Sci-Fi"],
    },
    MovieSeed {
        title: "Goodfellas",
        year: 1990,
        runtime: 146,
        genres: &["Biography", "Crime", "Drama"],
    },
];

pub async fn seed_movie(db: &DatabaseConnection, seed: &MovieSeed) -> Result<i64, DbErr> {
    movie::Model::create(db, seed.title, seed.year, seed.runtime, seed.genres)
        .await
        .map(|m| m.id)
}

pub struct MovieSeeder;

#[async_trait]
impl Seeder for MovieSeeder {
    fn name(&self) -> &'static str {
        "movies"
    }

    async fn seed(&self, db: &DatabaseConnection) -> SeedReport {
        let mut report = SeedReport::default();

        for seed in &MOVIES {
            let result = seed_movie(db, seed).await;
            match &result {
                Ok(id) => tracing::info!(title = seed.title, id, "successfully seeded movie"),
                Err(err) => tracing::error!(title = seed.title, error = %err, "error inserting movie"),
            }
            report.record(&result);
        }

        report
    }
}
