//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository and clock traits; AppState pins them
//! to the SQLite repositories and the system clock.

use std::path::PathBuf;
use std::sync::Arc;

use tutorhub_core::clock::SystemClock;
use tutorhub_core::service::booking::BookingService;
use tutorhub_core::service::city::CityService;
use tutorhub_core::service::review::ReviewService;
use tutorhub_core::service::schedule::ScheduleService;
use tutorhub_core::service::student::StudentService;
use tutorhub_core::service::subject::SubjectService;
use tutorhub_core::service::teaching_level::TeachingLevelService;
use tutorhub_core::service::tutor::TutorService;
use tutorhub_core::service::tutor_subject::TutorSubjectService;
use tutorhub_infra::sqlite::booking::SqliteBookingRepository;
use tutorhub_infra::sqlite::city::SqliteCityRepository;
use tutorhub_infra::sqlite::pool::DatabasePool;
use tutorhub_infra::sqlite::review::SqliteReviewRepository;
use tutorhub_infra::sqlite::schedule::SqliteScheduleRepository;
use tutorhub_infra::sqlite::student::SqliteStudentRepository;
use tutorhub_infra::sqlite::subject::SqliteSubjectRepository;
use tutorhub_infra::sqlite::teaching_level::SqliteTeachingLevelRepository;
use tutorhub_infra::sqlite::tutor::SqliteTutorRepository;
use tutorhub_infra::sqlite::tutor_subject::SqliteTutorSubjectRepository;
use tutorhub_infra::sqlite::user::SqliteUserRepository;
use tutorhub_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteCityService = CityService<SqliteCityRepository>;

pub type ConcreteSubjectService = SubjectService<SqliteSubjectRepository>;

pub type ConcreteTeachingLevelService = TeachingLevelService<SqliteTeachingLevelRepository>;

pub type ConcreteStudentService =
    StudentService<SqliteStudentRepository, SqliteUserRepository, SqliteCityRepository, SystemClock>;

pub type ConcreteTutorService =
    TutorService<SqliteTutorRepository, SqliteUserRepository, SqliteCityRepository, SystemClock>;

pub type ConcreteTutorSubjectService = TutorSubjectService<
    SqliteTutorSubjectRepository,
    SqliteTutorRepository,
    SqliteSubjectRepository,
    SqliteTeachingLevelRepository,
>;

pub type ConcreteScheduleService =
    ScheduleService<SqliteScheduleRepository, SqliteTutorRepository, SystemClock>;

pub type ConcreteBookingService = BookingService<
    SqliteBookingRepository,
    SqliteScheduleRepository,
    SqliteTutorSubjectRepository,
    SqliteStudentRepository,
    SqliteTutorRepository,
    SqliteReviewRepository,
    SystemClock,
>;

pub type ConcreteReviewService = ReviewService<
    SqliteReviewRepository,
    SqliteBookingRepository,
    SqliteScheduleRepository,
    SystemClock,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub city_service: Arc<ConcreteCityService>,
    pub subject_service: Arc<ConcreteSubjectService>,
    pub level_service: Arc<ConcreteTeachingLevelService>,
    pub student_service: Arc<ConcreteStudentService>,
    pub tutor_service: Arc<ConcreteTutorService>,
    pub tutor_subject_service: Arc<ConcreteTutorSubjectService>,
    pub schedule_service: Arc<ConcreteScheduleService>,
    pub booking_service: Arc<ConcreteBookingService>,
    pub review_service: Arc<ConcreteReviewService>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: open the database, wire services.
    pub async fn init(data_dir: PathBuf, config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::open(&data_dir, &config.database).await?;
        tracing::debug!(
            data_dir = %data_dir.display(),
            file = %config.database.filename,
            "database opened"
        );
        Ok(Self::with_pool(db_pool, data_dir))
    }

    /// Wire every service over an already-open pool.
    pub fn with_pool(db_pool: DatabasePool, data_dir: PathBuf) -> Self {
        let pool = &db_pool;

        let city_service = CityService::new(SqliteCityRepository::new(pool.clone()));
        let subject_service = SubjectService::new(SqliteSubjectRepository::new(pool.clone()));
        let level_service =
            TeachingLevelService::new(SqliteTeachingLevelRepository::new(pool.clone()));

        let student_service = StudentService::new(
            SqliteStudentRepository::new(pool.clone()),
            SqliteUserRepository::new(pool.clone()),
            SqliteCityRepository::new(pool.clone()),
            SystemClock,
        );
        let tutor_service = TutorService::new(
            SqliteTutorRepository::new(pool.clone()),
            SqliteUserRepository::new(pool.clone()),
            SqliteCityRepository::new(pool.clone()),
            SystemClock,
        );
        let tutor_subject_service = TutorSubjectService::new(
            SqliteTutorSubjectRepository::new(pool.clone()),
            SqliteTutorRepository::new(pool.clone()),
            SqliteSubjectRepository::new(pool.clone()),
            SqliteTeachingLevelRepository::new(pool.clone()),
        );

        let schedule_service = ScheduleService::new(
            SqliteScheduleRepository::new(pool.clone()),
            SqliteTutorRepository::new(pool.clone()),
            SystemClock,
        );
        let booking_service = BookingService::new(
            SqliteBookingRepository::new(pool.clone()),
            SqliteScheduleRepository::new(pool.clone()),
            SqliteTutorSubjectRepository::new(pool.clone()),
            SqliteStudentRepository::new(pool.clone()),
            SqliteTutorRepository::new(pool.clone()),
            SqliteReviewRepository::new(pool.clone()),
            SystemClock,
        );
        let review_service = ReviewService::new(
            SqliteReviewRepository::new(pool.clone()),
            SqliteBookingRepository::new(pool.clone()),
            SqliteScheduleRepository::new(pool.clone()),
            SystemClock,
        );

        Self {
            city_service: Arc::new(city_service),
            subject_service: Arc::new(subject_service),
            level_service: Arc::new(level_service),
            student_service: Arc::new(student_service),
            tutor_service: Arc::new(tutor_service),
            tutor_subject_service: Arc::new(tutor_subject_service),
            schedule_service: Arc::new(schedule_service),
            booking_service: Arc::new(booking_service),
            review_service: Arc::new(review_service),
            data_dir,
            db_pool,
        }
    }
}
