//! Shared helpers for the repository tests.

use chrono::{NaiveDate, NaiveTime, Utc};
use tutorhub_core::repository::schedule::{NewSchedule, ScheduleRepository};
use tutorhub_core::repository::student::StudentRepository;
use tutorhub_core::repository::subject::SubjectRepository;
use tutorhub_core::repository::teaching_level::TeachingLevelRepository;
use tutorhub_core::repository::tutor::TutorRepository;
use tutorhub_core::repository::tutor_subject::TutorSubjectRepository;
use tutorhub_types::account::{
    CreateStudentRequest, CreateTutorRequest, CreateUserRequest, StudentDetails, TutorDetails,
    UserType,
};
use tutorhub_types::catalog::{SubjectRequest, TeachingLevelRequest};
use tutorhub_types::city::{CityRequest, DEFAULT_COUNTRY};
use tutorhub_types::id::{
    CityId, LevelId, ScheduleId, StudentId, SubjectId, TutorId, TutorSubjectId,
};
use tutorhub_types::money::HourlyRate;
use tutorhub_types::tutor_subject::CreateTutorSubjectRequest;

use super::pool::{DatabasePool, database_url};
use super::schedule::SqliteScheduleRepository;
use super::student::SqliteStudentRepository;
use super::subject::SqliteSubjectRepository;
use super::teaching_level::SqliteTeachingLevelRepository;
use super::tutor::SqliteTutorRepository;
use super::tutor_subject::SqliteTutorSubjectRepository;

pub(crate) async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(dir.path(), "test.db");
    // Leak tempdir so it lives for the test
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

pub(crate) fn city_request(name: &str, region: Option<&str>) -> CityRequest {
    CityRequest {
        name: name.to_string(),
        region: region.map(str::to_string),
        country: DEFAULT_COUNTRY.to_string(),
    }
}

fn user_request(email: &str, user_type: UserType) -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Тарас".to_string(),
        last_name: "Бондар".to_string(),
        email: email.to_string(),
        phone: None,
        user_type,
        date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1),
    }
}

pub(crate) fn student_request(
    email: &str,
    city_id: Option<i64>,
    school_grade: Option<i16>,
) -> CreateStudentRequest {
    CreateStudentRequest {
        user: user_request(email, UserType::Student),
        details: StudentDetails {
            city_id,
            school_grade,
        },
    }
}

pub(crate) fn tutor_request(email: &str, online: bool, offline: bool) -> CreateTutorRequest {
    CreateTutorRequest {
        user: user_request(email, UserType::Tutor),
        details: TutorDetails {
            city_id: None,
            years_experience: 5,
            education: "KNU, Mathematics".to_string(),
            about_me: None,
            online_available: online,
            offline_available: offline,
            address: offline.then(|| "Khreshchatyk 1".to_string()),
        },
    }
}

pub(crate) async fn seed_student(
    pool: &DatabasePool,
    email: &str,
    city_id: Option<CityId>,
) -> StudentId {
    SqliteStudentRepository::new(pool.clone())
        .create(
            &student_request(email, city_id.map(CityId::get), Some(8)),
            Utc::now(),
        )
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_tutor(
    pool: &DatabasePool,
    email: &str,
    online: bool,
    offline: bool,
) -> TutorId {
    SqliteTutorRepository::new(pool.clone())
        .create(&tutor_request(email, online, offline), Utc::now())
        .await
        .unwrap()
        .id
}

pub(crate) async fn seed_offer(
    pool: &DatabasePool,
    tutor: TutorId,
    subject: SubjectId,
    level: LevelId,
    cents: i64,
) -> TutorSubjectId {
    SqliteTutorSubjectRepository::new(pool.clone())
        .create(&CreateTutorSubjectRequest {
            tutor_id: tutor.get(),
            subject_id: subject.get(),
            level_id: level.get(),
            hourly_rate: HourlyRate::from_cents(cents),
        })
        .await
        .unwrap()
        .id
}

pub(crate) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, d).unwrap()
}

pub(crate) fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

pub(crate) async fn seed_slot(
    pool: &DatabasePool,
    tutor: TutorId,
    date: NaiveDate,
    start_hour: u32,
) -> ScheduleId {
    SqliteScheduleRepository::new(pool.clone())
        .create(&NewSchedule {
            tutor_id: tutor,
            date,
            start_time: hour(start_hour),
            end_time: hour(start_hour + 1),
            created_at: Utc::now(),
        })
        .await
        .unwrap()
        .id
}

/// One tutor teaching one subject at one level, with a single open slot on
/// 2030-01-10 at 10:00, and one student.
pub(crate) struct Fixture {
    pub subject: SubjectId,
    pub level: LevelId,
    pub tutor: TutorId,
    pub offer: TutorSubjectId,
    pub slot: ScheduleId,
    pub student: StudentId,
}

impl Fixture {
    pub(crate) async fn new(pool: &DatabasePool) -> Self {
        let subject = SqliteSubjectRepository::new(pool.clone())
            .create(&SubjectRequest {
                name: "Математика".to_string(),
                category: "STEM".to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id;
        let level = SqliteTeachingLevelRepository::new(pool.clone())
            .create(&TeachingLevelRequest {
                name: "Середня школа".to_string(),
                position: 1,
                description: None,
            })
            .await
            .unwrap()
            .id;
        let tutor = seed_tutor(pool, "fixture.tutor@example.com", true, false).await;
        let offer = seed_offer(pool, tutor, subject, level, 60_000).await;
        let slot = seed_slot(pool, tutor, day(10), 10).await;
        let student = seed_student(pool, "fixture.student@example.com", None).await;

        Self {
            subject,
            level,
            tutor,
            offer,
            slot,
            student,
        }
    }
}
