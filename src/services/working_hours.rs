//! Working hours service for hospitals and doctors

use crate::{
    error::AppResult,
    models::working_hours::{StoredHours, WorkingHours, WorkingHoursForm, WorkingHoursInitial},
    repository::Repository,
    scheduling::working_hours,
};

#[derive(Clone)]
pub struct WorkingHoursService {
    repository: Repository,
}

impl WorkingHoursService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate a submitted form and convert it to the persisted structure
    pub fn build_working_hours_from_form(&self, form: &WorkingHoursForm) -> AppResult<WorkingHours> {
        form.validate()?;
        working_hours::from_form_input(form)
    }

    pub fn build_initial_working_hours(&self, stored: &StoredHours) -> WorkingHoursInitial {
        working_hours::to_form_initial(
            &stored.working_hours.clone().unwrap_or_default(),
            stored.is_open_24_hours.unwrap_or(false),
        )
    }

    pub async fn get_hospital_hours(&self, hospital_id: &str) -> AppResult<WorkingHoursInitial> {
        let stored = self.repository.working_hours.hospital_hours(hospital_id).await?;
        Ok(self.build_initial_working_hours(&stored))
    }

    pub async fn update_hospital_hours(
        &self,
        hospital_id: &str,
        form: &WorkingHoursForm,
    ) -> AppResult<WorkingHoursInitial> {
        let hours = self.build_working_hours_from_form(form)?;
        let stored = self
            .repository
            .working_hours
            .update_hospital_hours(hospital_id, &hours, form.is_open_24_hours)
            .await?;
        tracing::info!(%hospital_id, is_open_24_hours = form.is_open_24_hours, "Hospital working hours updated");
        Ok(self.build_initial_working_hours(&stored))
    }

    pub async fn get_doctor_hours(&self, doctor_id: &str) -> AppResult<WorkingHoursInitial> {
        let stored = self.repository.working_hours.doctor_hours(doctor_id).await?;
        Ok(self.build_initial_working_hours(&stored))
    }

    /// Doctors have no 24h mode; the form's flag is ignored
    pub async fn update_doctor_hours(&self, doctor_id: &str, form: &WorkingHoursForm) -> AppResult<WorkingHoursInitial> {
        let form = WorkingHoursForm {
            is_open_24_hours: false,
            days: form.days.clone(),
        };
        let hours = self.build_working_hours_from_form(&form)?;
        let stored = self
            .repository
            .working_hours
            .update_doctor_hours(doctor_id, &hours)
            .await?;
        tracing::info!(%doctor_id, "Doctor working hours updated");
        Ok(self.build_initial_working_hours(&stored))
    }
}
