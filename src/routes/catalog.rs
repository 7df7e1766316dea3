use axum::{response::IntoResponse, Json};

use crate::dto::interview_dto::{CatalogResponse, RoleSkills};
use crate::models::catalog::{skills_for_role, CODING_SKILLS, ROLES};
use crate::models::difficulty::Difficulty;
use crate::models::model_profile::ModelProfile;
use crate::models::session::MAX_QUESTION_COUNT;
use crate::models::stage::Stage;

#[axum::debug_handler]
pub async fn get_catalog() -> impl IntoResponse {
    Json(CatalogResponse {
        stages: Stage::ALL.to_vec(),
        roles: ROLES
            .iter()
            .map(|role| RoleSkills {
                role: *role,
                skills: skills_for_role(role),
            })
            .collect(),
        coding_skills: &CODING_SKILLS,
        models: ModelProfile::model_names().collect(),
        difficulties: Difficulty::ALL.to_vec(),
        max_question_count: MAX_QUESTION_COUNT,
    })
}
