use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StudentQuery {
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
    #[serde(rename = "schoolId")]
    pub school_id: Option<String>,
    #[serde(rename = "campusId")]
    pub campus_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClassQuery {
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
    #[serde(rename = "schoolId")]
    pub school_id: Option<String>,
    #[serde(rename = "campusId")]
    pub campus_id: Option<String>,
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<String>,
}
