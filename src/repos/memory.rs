//! In-memory implementation of every store trait, for tests.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::repos::{
    appointment_repo::{
        Appointment, AppointmentPatch, AppointmentStatus, AppointmentStore, AppointmentWithOwner,
        NewAppointment,
    },
    assessment_repo::{AssessmentRow, AssessmentStore, AssessmentWithOwner, NewAssessment},
    career_repo::{CareerPatch, CareerRow, CareerStore, NewCareer},
    error::{RepoError, RepoResult},
    user_repo::{
        NewUser, OwnerSummary, ProfilePatch, Role, User, UserCredentials, UserStore,
        normalize_email,
    },
};

#[derive(Default)]
struct Inner {
    users: Vec<UserCredentials>,
    careers: Vec<CareerRow>,
    appointments: Vec<Appointment>,
    assessments: Vec<AssessmentRow>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // Rows whose owner is gone drop out, like an inner join.
    fn owner_of(&self, user_id: Uuid) -> Option<OwnerSummary> {
        self.users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| OwnerSummary::from(&c.user))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_enriched: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `list_all_with_owner` fail, as a broken join would.
    pub fn fail_enriched_reads(&self) {
        self.fail_enriched.store(true, Ordering::SeqCst);
    }

    /// Remove a user without touching their resources.
    pub fn remove_user(&self, user_id: Uuid) {
        self.lock().users.retain(|c| c.user.id != user_id);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let email = normalize_email(email);
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone()))
    }

    async fn create(&self, new_user: NewUser) -> RepoResult<User> {
        let mut inner = self.lock();
        let email = normalize_email(&new_user.email);
        if inner.users.iter().any(|c| c.user.email == email) {
            return Err(RepoError::Conflict);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email,
            role: Role::User,
            phone: None,
            created_at: Utc::now(),
        };
        inner.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.lock().users.iter().rev().map(|c| c.user.clone()).collect())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> RepoResult<Option<User>> {
        let mut inner = self.lock();
        if let Some(email) = patch.email.as_deref().map(normalize_email)
            && inner
                .users
                .iter()
                .any(|c| c.user.email == email && c.user.id != user_id)
        {
            return Err(RepoError::Conflict);
        }

        let Some(creds) = inner.users.iter_mut().find(|c| c.user.id == user_id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            creds.user.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            creds.user.email = normalize_email(&email);
        }
        if let Some(phone) = patch.phone {
            creds.user.phone = Some(phone);
        }
        Ok(Some(creds.user.clone()))
    }

    async fn update_role(&self, user_id: Uuid, role: Role) -> RepoResult<Option<User>> {
        let mut inner = self.lock();
        let Some(creds) = inner.users.iter_mut().find(|c| c.user.id == user_id) else {
            return Ok(None);
        };
        creds.user.role = role;
        Ok(Some(creds.user.clone()))
    }
}

#[async_trait]
impl CareerStore for MemoryStore {
    async fn list(&self) -> RepoResult<Vec<CareerRow>> {
        Ok(self.lock().careers.iter().rev().cloned().collect())
    }

    async fn get(&self, career_id: i64) -> RepoResult<Option<CareerRow>> {
        Ok(self
            .lock()
            .careers
            .iter()
            .find(|c| c.career_id == career_id)
            .cloned())
    }

    async fn create(&self, new_career: NewCareer) -> RepoResult<CareerRow> {
        let mut inner = self.lock();
        let now = Utc::now();
        let row = CareerRow {
            career_id: inner.next_id(),
            title: new_career.title,
            description: new_career.description,
            avg_salary: new_career.avg_salary,
            education_required: new_career.education_required,
            skills: new_career.skills,
            created_at: now,
            updated_at: now,
        };
        inner.careers.push(row.clone());
        Ok(row)
    }

    async fn update(&self, career_id: i64, patch: CareerPatch) -> RepoResult<Option<CareerRow>> {
        let mut inner = self.lock();
        let Some(row) = inner.careers.iter_mut().find(|c| c.career_id == career_id) else {
            return Ok(None);
        };
        if let Some(v) = patch.title {
            row.title = v;
        }
        if let Some(v) = patch.description {
            row.description = v;
        }
        if let Some(v) = patch.avg_salary {
            row.avg_salary = v;
        }
        if let Some(v) = patch.education_required {
            row.education_required = v;
        }
        if let Some(v) = patch.skills {
            row.skills = v;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, career_id: i64) -> RepoResult<bool> {
        let mut inner = self.lock();
        let before = inner.careers.len();
        inner.careers.retain(|c| c.career_id != career_id);
        Ok(inner.careers.len() < before)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<Appointment>> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> RepoResult<Vec<Appointment>> {
        Ok(self.lock().appointments.iter().rev().cloned().collect())
    }

    async fn list_all_with_owner(&self) -> RepoResult<Vec<AppointmentWithOwner>> {
        if self.fail_enriched.load(Ordering::SeqCst) {
            return Err(RepoError::InvalidRow("join failed".to_string()));
        }

        let inner = self.lock();
        Ok(inner
            .appointments
            .iter()
            .rev()
            .filter_map(|a| {
                Some(AppointmentWithOwner {
                    appointment: a.clone(),
                    owner: inner.owner_of(a.user_id)?,
                })
            })
            .collect())
    }

    async fn get(&self, appointment_id: i64) -> RepoResult<Option<Appointment>> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .find(|a| a.appointment_id == appointment_id)
            .cloned())
    }

    async fn create(&self, new_appointment: NewAppointment) -> RepoResult<Appointment> {
        let mut inner = self.lock();
        let now = Utc::now();
        let appointment = Appointment {
            appointment_id: inner.next_id(),
            user_id: new_appointment.user_id,
            name: new_appointment.name,
            email: new_appointment.email,
            date: new_appointment.date,
            time: new_appointment.time,
            mode: new_appointment.mode,
            notes: new_appointment.notes,
            status: AppointmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update(
        &self,
        appointment_id: i64,
        patch: AppointmentPatch,
    ) -> RepoResult<Option<Appointment>> {
        let mut inner = self.lock();
        let Some(a) = inner
            .appointments
            .iter_mut()
            .find(|a| a.appointment_id == appointment_id)
        else {
            return Ok(None);
        };
        if let Some(v) = patch.date {
            a.date = v;
        }
        if let Some(v) = patch.time {
            a.time = v;
        }
        if let Some(v) = patch.mode {
            a.mode = v;
        }
        if let Some(v) = patch.notes {
            a.notes = v;
        }
        if let Some(v) = patch.status {
            a.status = v;
        }
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }

    async fn delete(&self, appointment_id: i64) -> RepoResult<bool> {
        let mut inner = self.lock();
        let before = inner.appointments.len();
        inner
            .appointments
            .retain(|a| a.appointment_id != appointment_id);
        Ok(inner.appointments.len() < before)
    }
}

#[async_trait]
impl AssessmentStore for MemoryStore {
    async fn list_by_owner(&self, user_id: Uuid) -> RepoResult<Vec<AssessmentRow>> {
        Ok(self
            .lock()
            .assessments
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> RepoResult<Vec<AssessmentRow>> {
        Ok(self.lock().assessments.iter().rev().cloned().collect())
    }

    async fn list_all_with_owner(&self) -> RepoResult<Vec<AssessmentWithOwner>> {
        if self.fail_enriched.load(Ordering::SeqCst) {
            return Err(RepoError::InvalidRow("join failed".to_string()));
        }

        let inner = self.lock();
        Ok(inner
            .assessments
            .iter()
            .rev()
            .filter_map(|a| {
                Some(AssessmentWithOwner {
                    assessment: a.clone(),
                    owner: inner.owner_of(a.user_id)?,
                })
            })
            .collect())
    }

    async fn get(&self, assessment_id: i64) -> RepoResult<Option<AssessmentRow>> {
        Ok(self
            .lock()
            .assessments
            .iter()
            .find(|a| a.assessment_id == assessment_id)
            .cloned())
    }

    async fn create(&self, new_assessment: NewAssessment) -> RepoResult<AssessmentRow> {
        let mut inner = self.lock();
        let now = Utc::now();
        let row = AssessmentRow {
            assessment_id: inner.next_id(),
            user_id: new_assessment.user_id,
            title: new_assessment.title,
            score: new_assessment.score,
            total: new_assessment.total,
            taken_at: now,
            created_at: now,
        };
        inner.assessments.push(row.clone());
        Ok(row)
    }

    async fn delete(&self, assessment_id: i64) -> RepoResult<bool> {
        let mut inner = self.lock();
        let before = inner.assessments.len();
        inner.assessments.retain(|a| a.assessment_id != assessment_id);
        Ok(inner.assessments.len() < before)
    }
}
