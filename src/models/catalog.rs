use crate::error::{Error, Result};
use crate::models::model_profile::ModelProfile;
use crate::models::stage::Stage;

pub const UNSELECTED: &str = "Select";
pub const APTITUDE_SKILL: &str = "Aptitude";

pub const ROLES: [&str; 14] = [
    "Data Analyst",
    "Machine Learning Engineer",
    "Web Developer",
    "Power BI Developer",
    "Data Scientist",
    "Frontend Developer",
    "Backend Developer",
    "Fullstack Developer",
    "DevOps Engineer",
    "Cloud Engineer",
    "Mobile App Developer",
    "Game Developer",
    "Cybersecurity Specialist",
    "AI Researcher",
];

pub const CODING_SKILLS: [&str; 10] = [
    "Python", "SQL", "DSA", "R", "Java", "C++", "JavaScript", "Go", "Kotlin", "Swift",
];

pub fn skills_for_role(role: &str) -> &'static [&'static str] {
    match role {
        "Data Analyst" => &["Python", "SQL", "Excel", "Data Visualization", "Power BI", "Tableau"],
        "Machine Learning Engineer" => &[
            "Python",
            "R",
            "SQL",
            "Machine Learning",
            "Deep Learning",
            "TensorFlow",
            "PyTorch",
        ],
        "Web Developer" => &["HTML", "CSS", "JavaScript", "React", "Angular", "Node.js", "PHP"],
        "Power BI Developer" => &["Power BI", "DAX", "SQL", "Data Modeling", "Excel"],
        "Data Scientist" => &[
            "Python",
            "R",
            "SQL",
            "Statistics",
            "Machine Learning",
            "Data Wrangling",
        ],
        "Frontend Developer" => &["HTML", "CSS", "JavaScript", "React", "Vue.js", "TypeScript"],
        "Backend Developer" => &["Python", "Java", "C#", "Node.js", "Ruby", "Go", "SQL"],
        "Fullstack Developer" => &["HTML", "CSS", "JavaScript", "React", "Node.js", "Python", "SQL"],
        "DevOps Engineer" => &["Docker", "Kubernetes", "AWS", "Azure", "CI/CD", "Linux", "Terraform"],
        "Cloud Engineer" => &["AWS", "Azure", "Google Cloud", "Kubernetes", "Terraform", "Python"],
        "Mobile App Developer" => &["Kotlin", "Swift", "Java", "Flutter", "React Native"],
        "Game Developer" => &["C++", "C#", "Unity", "Unreal Engine", "Game Physics"],
        "Cybersecurity Specialist" => &[
            "Network Security",
            "Penetration Testing",
            "Python",
            "Cryptography",
            "SIEM",
        ],
        "AI Researcher" => &[
            "Python",
            "TensorFlow",
            "PyTorch",
            "NLP",
            "Computer Vision",
            "Reinforcement Learning",
        ],
        _ => &[],
    }
}

/// Checks a role/skill/model choice and returns the skill the session
/// should use.
pub fn resolve_skill(stage: Stage, role: &str, skill: &str, model: &str) -> Result<String> {
    if ModelProfile::lookup(model).is_none() {
        return Err(Error::BadRequest(format!("Unknown model: {}", model)));
    }
    if role != UNSELECTED && !ROLES.contains(&role) {
        return Err(Error::BadRequest(format!("Unknown job role: {}", role)));
    }

    match stage {
        Stage::Aptitude => Ok(APTITUDE_SKILL.to_string()),
        Stage::Coding => {
            if CODING_SKILLS.contains(&skill) {
                Ok(skill.to_string())
            } else {
                Err(Error::BadRequest(format!("Unknown coding skill: {}", skill)))
            }
        }
        Stage::Technical | Stage::Behavioral => {
            if role == UNSELECTED {
                return Err(Error::BadRequest(format!(
                    "A job role is required for the {} stage",
                    stage
                )));
            }
            if skills_for_role(role).contains(&skill) {
                Ok(skill.to_string())
            } else {
                Err(Error::BadRequest(format!("Skill {} is not offered for {}", skill, role)))
            }
        }
    }
}
