//! Database-backed checks of the competition schema.
//!
//! These need a PostgreSQL instance reachable through `DATABASE_URL`; without
//! one each test returns early.

use chrono::{NaiveDate, NaiveDateTime};
use storage::Database;
use storage::dto::common::PaginationParams;
use storage::dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest};
use storage::dto::sport::{CreateSportRequest, UpdateSportRequest};
use storage::dto::stage::{CreateStageRequest, StageFilter, UpdateStageRequest};
use storage::error::StorageError;
use storage::models::{Competition, Sport};
use storage::repository::competition::CompetitionRepository;
use storage::repository::overview::OverviewRepository;
use storage::repository::sport::SportRepository;
use storage::repository::stage::StageRepository;
use uuid::Uuid;

async fn test_database() -> Option<Database> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };

    let db = Database::new(&url).await.expect("connect to test database");
    db.run_migrations().await.expect("run migrations");
    Some(db)
}

/// Names must be unique across runs against the same database.
fn unique(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

async fn create_sport(db: &Database, name: &str) -> Sport {
    SportRepository::new(db.pool())
        .create(&CreateSportRequest {
            name: unique(name),
            description: Some("Pool sport".to_string()),
        })
        .await
        .expect("create sport")
}

async fn create_competition(db: &Database, name: &str, sport_ids: Vec<Uuid>) -> Competition {
    CompetitionRepository::new(db.pool())
        .create(&CreateCompetitionRequest {
            name: unique(name),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 10),
            sport_ids,
        })
        .await
        .expect("create competition")
}

fn stage_request(competition: &Competition, sport: &Sport, name: &str) -> CreateStageRequest {
    CreateStageRequest {
        competition_id: competition.competition_id,
        sport_id: sport.sport_id,
        name: name.to_string(),
        starts_at: at(2024, 1, 2, 9),
        place: Some("Main Pool".to_string()),
    }
}

#[tokio::test]
async fn test_city_cup_scenario() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Swimming").await;
    let competition = create_competition(&db, "City Cup", Vec::new()).await;

    let competitions = CompetitionRepository::new(db.pool());
    competitions
        .associate_sports(competition.competition_id, &[sport.sport_id])
        .await
        .unwrap();

    let stages = StageRepository::new(db.pool());
    stages
        .create(&stage_request(&competition, &sport, "Heats"))
        .await
        .unwrap();

    let listed = stages
        .list_for_pair(competition.competition_id, sport.sport_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Heats");
    assert_eq!(listed[0].place.as_deref(), Some("Main Pool"));
}

#[tokio::test]
async fn test_duplicate_sport_name_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let repo = SportRepository::new(db.pool());
    let name = unique("Rowing");
    let req = CreateSportRequest {
        name: name.clone(),
        description: None,
    };

    repo.create(&req).await.unwrap();
    let err = repo.create(&req).await.unwrap_err();
    assert!(matches!(err, StorageError::Uniqueness(_)), "got {err:?}");
}

#[tokio::test]
async fn test_renaming_sport_onto_existing_name_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let first = create_sport(&db, "Judo").await;
    let second = create_sport(&db, "Karate").await;

    let err = SportRepository::new(db.pool())
        .update(
            second.sport_id,
            &UpdateSportRequest {
                name: Some(first.name.clone()),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Uniqueness(_)), "got {err:?}");
}

#[tokio::test]
async fn test_concurrent_partial_sport_updates_both_apply() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Swim").await;
    let renamed = unique("Renamed");
    let repo = SportRepository::new(db.pool());

    let rename = UpdateSportRequest {
        name: Some(renamed.clone()),
        description: None,
    };
    let describe = UpdateSportRequest {
        name: None,
        description: Some(Some("new".to_string())),
    };
    let (first, second) = tokio::join!(
        repo.update(sport.sport_id, &rename),
        repo.update(sport.sport_id, &describe),
    );
    first.unwrap();
    second.unwrap();

    let stored = repo.find_by_id(sport.sport_id).await.unwrap();
    assert_eq!(stored.name, renamed);
    assert_eq!(stored.description.as_deref(), Some("new"));
}

#[tokio::test]
async fn test_sport_description_can_be_cleared() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Diving").await;
    let repo = SportRepository::new(db.pool());

    let kept = repo
        .update(sport.sport_id, &UpdateSportRequest::default())
        .await
        .unwrap();
    assert_eq!(kept.description.as_deref(), Some("Pool sport"));

    let cleared = repo
        .update(
            sport.sport_id,
            &UpdateSportRequest {
                name: None,
                description: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn test_reversed_competition_dates_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let err = CompetitionRepository::new(db.pool())
        .create(&CreateCompetitionRequest {
            name: unique("Bad Cup"),
            start_date: date(2024, 2, 10),
            end_date: date(2024, 2, 1),
            sport_ids: Vec::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_association_is_idempotent() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Diving").await;
    let competition = create_competition(&db, "Summer Games", Vec::new()).await;
    let repo = CompetitionRepository::new(db.pool());

    let first = repo
        .associate_sports(competition.competition_id, &[sport.sport_id])
        .await
        .unwrap();
    let second = repo
        .associate_sports(competition.competition_id, &[sport.sport_id, sport.sport_id])
        .await
        .unwrap();

    assert_eq!(first, second);

    let reloaded = repo.find_by_id(competition.competition_id).await.unwrap();
    assert_eq!(reloaded.sport_ids, vec![sport.sport_id]);

    let sport = SportRepository::new(db.pool())
        .find_by_id(sport.sport_id)
        .await
        .unwrap();
    assert_eq!(sport.competition_ids, vec![competition.competition_id]);
}

#[tokio::test]
async fn test_associating_unknown_sport_is_referential_error() {
    let Some(db) = test_database().await else {
        return;
    };

    let competition = create_competition(&db, "Winter Games", Vec::new()).await;
    let err = CompetitionRepository::new(db.pool())
        .associate_sports(competition.competition_id, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Referential(_)), "got {err:?}");
}

#[tokio::test]
async fn test_stage_for_unassociated_pair_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Fencing").await;
    let competition = create_competition(&db, "Open Cup", Vec::new()).await;

    let err = StageRepository::new(db.pool())
        .create(&stage_request(&competition, &sport, "Pools"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Referential(_)), "got {err:?}");
}

#[tokio::test]
async fn test_stage_outside_competition_dates_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Archery").await;
    let competition = create_competition(&db, "Forest Cup", vec![sport.sport_id]).await;
    let repo = StageRepository::new(db.pool());

    let mut early = stage_request(&competition, &sport, "Qualification");
    early.starts_at = at(2023, 12, 31, 12);
    let err = repo.create(&early).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)), "got {err:?}");

    let mut late = stage_request(&competition, &sport, "Final");
    late.starts_at = at(2024, 1, 11, 8);
    let err = repo.create(&late).await.unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_stage_names_unique_per_pair() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Cycling").await;
    let competition = create_competition(&db, "Tour", vec![sport.sport_id]).await;
    let repo = StageRepository::new(db.pool());

    repo.create(&stage_request(&competition, &sport, "Prologue"))
        .await
        .unwrap();
    let err = repo
        .create(&stage_request(&competition, &sport, "Prologue"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Uniqueness(_)), "got {err:?}");
}

#[tokio::test]
async fn test_stages_listed_in_schedule_order() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Athletics").await;
    let competition = create_competition(&db, "Track Meet", vec![sport.sport_id]).await;
    let repo = StageRepository::new(db.pool());

    for (name, day) in [("Final", 5), ("Heats", 2), ("Semi-final", 3)] {
        let mut req = stage_request(&competition, &sport, name);
        req.starts_at = at(2024, 1, day, 10);
        repo.create(&req).await.unwrap();
    }

    let names: Vec<String> = repo
        .list_for_pair(competition.competition_id, sport.sport_id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Heats", "Semi-final", "Final"]);

    let filter = StageFilter {
        competition_id: Some(competition.competition_id),
        sport_id: None,
    };
    let page = PaginationParams {
        page: 2,
        page_size: 2,
    };
    let (second_page, total) = repo.list(&filter, &page).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Final");
}

#[tokio::test]
async fn test_stage_update_keeps_invariants() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Sailing").await;
    let other = create_sport(&db, "Surfing").await;
    let competition = create_competition(&db, "Coast Cup", vec![sport.sport_id]).await;
    let repo = StageRepository::new(db.pool());

    let stage = repo
        .create(&stage_request(&competition, &sport, "Race 1"))
        .await
        .unwrap();

    let moved = repo
        .update(
            stage.stage_id,
            &UpdateStageRequest {
                starts_at: Some(at(2024, 1, 9, 14)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.starts_at, at(2024, 1, 9, 14));
    assert!(moved.modified_at >= moved.created_at);

    let err = repo
        .update(
            stage.stage_id,
            &UpdateStageRequest {
                sport_id: Some(other.sport_id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Referential(_)), "got {err:?}");

    let cleared = repo
        .update(
            stage.stage_id,
            &UpdateStageRequest {
                place: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.place, None);
    assert_eq!(cleared.starts_at, at(2024, 1, 9, 14));
}

#[tokio::test]
async fn test_narrowing_competition_around_stage_rejected() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Tennis").await;
    let competition = create_competition(&db, "Grass Open", vec![sport.sport_id]).await;
    StageRepository::new(db.pool())
        .create(&stage_request(&competition, &sport, "Round 1"))
        .await
        .unwrap();

    let repo = CompetitionRepository::new(db.pool());
    let err = repo
        .update(
            competition.competition_id,
            &UpdateCompetitionRequest {
                start_date: Some(date(2024, 1, 5)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Validation(_)), "got {err:?}");

    let widened = repo
        .update(
            competition.competition_id,
            &UpdateCompetitionRequest {
                end_date: Some(date(2024, 1, 20)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(widened.end_date, date(2024, 1, 20));
}

#[tokio::test]
async fn test_deleting_competition_cascades() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Boxing").await;
    let competition = create_competition(&db, "Fight Night", vec![sport.sport_id]).await;
    let stages = StageRepository::new(db.pool());
    let stage = stages
        .create(&stage_request(&competition, &sport, "Main Card"))
        .await
        .unwrap();

    CompetitionRepository::new(db.pool())
        .delete(competition.competition_id)
        .await
        .unwrap();

    assert!(matches!(
        stages.find_by_id(stage.stage_id).await,
        Err(StorageError::NotFound)
    ));

    let sport = SportRepository::new(db.pool())
        .find_by_id(sport.sport_id)
        .await
        .unwrap();
    assert!(sport.competition_ids.is_empty());
}

#[tokio::test]
async fn test_dissociating_sport_removes_its_stages() {
    let Some(db) = test_database().await else {
        return;
    };

    let sport = create_sport(&db, "Golf").await;
    let competition = create_competition(&db, "Links Cup", vec![sport.sport_id]).await;
    let stages = StageRepository::new(db.pool());
    let stage = stages
        .create(&stage_request(&competition, &sport, "Round 1"))
        .await
        .unwrap();

    let repo = CompetitionRepository::new(db.pool());
    repo.dissociate_sport(competition.competition_id, sport.sport_id)
        .await
        .unwrap();

    assert!(matches!(
        stages.find_by_id(stage.stage_id).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(
        repo.dissociate_sport(competition.competition_id, sport.sport_id)
            .await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn test_overview_counts_grow() {
    let Some(db) = test_database().await else {
        return;
    };

    let overview = OverviewRepository::new(db.pool());
    let before = overview.counts().await.unwrap();

    create_sport(&db, "Squash").await;

    let after = overview.counts().await.unwrap();
    assert!(after.sports > before.sports);
}
