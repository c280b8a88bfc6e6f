/**
 * Responsibility
 *  - core と types を束ねる
 *  - handlers に公開するのは意味付き ID 型 (PublicCareerId など) だけ
 */
mod core;
mod types;

pub use types::{PublicAppointmentId, PublicAssessmentId, PublicCareerId};
