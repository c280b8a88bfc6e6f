/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *  - 新しいリソースを足すときはここに Tag と alias を追加するだけ
 */
use super::core::PublicId;

// careers
pub enum CareerTag {}
pub type PublicCareerId = PublicId<CareerTag>;

// appointments
pub enum AppointmentTag {}
pub type PublicAppointmentId = PublicId<AppointmentTag>;

// assessments
pub enum AssessmentTag {}
pub type PublicAssessmentId = PublicId<AssessmentTag>;
