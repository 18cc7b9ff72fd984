use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Planning")]
    Planning,
    #[serde(rename = "Tender Open")]
    TenderOpen,
    #[serde(rename = "Evaluation")]
    Evaluation,
    #[serde(rename = "Awarded")]
    Awarded,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Disputed")]
    Disputed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::Planning,
        ProjectStatus::TenderOpen,
        ProjectStatus::Evaluation,
        ProjectStatus::Awarded,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::Delayed,
        ProjectStatus::Disputed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::TenderOpen => "Tender Open",
            ProjectStatus::Evaluation => "Evaluation",
            ProjectStatus::Awarded => "Awarded",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Delayed => "Delayed",
            ProjectStatus::Disputed => "Disputed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcurementMethod {
    #[serde(rename = "Works-NCB")]
    WorksNcb,
    #[serde(rename = "Works-ICB")]
    WorksIcb,
    #[serde(rename = "Goods-NCB")]
    GoodsNcb,
    #[serde(rename = "Goods-ICB")]
    GoodsIcb,
    #[serde(rename = "Consulting")]
    Consulting,
    #[serde(rename = "Shopping")]
    Shopping,
}

impl fmt::Display for ProcurementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcurementMethod::WorksNcb => "Works-NCB",
            ProcurementMethod::WorksIcb => "Works-ICB",
            ProcurementMethod::GoodsNcb => "Goods-NCB",
            ProcurementMethod::GoodsIcb => "Goods-ICB",
            ProcurementMethod::Consulting => "Consulting",
            ProcurementMethod::Shopping => "Shopping",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewType {
    #[serde(rename = "Progress Update")]
    ProgressUpdate,
    #[serde(rename = "Quality Issue")]
    QualityIssue,
    #[serde(rename = "Completion Verification")]
    CompletionVerification,
    #[serde(rename = "Delay Report")]
    DelayReport,
    #[serde(rename = "Fraud Alert")]
    FraudAlert,
}

impl ReviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::ProgressUpdate => "Progress Update",
            ReviewType::QualityIssue => "Quality Issue",
            ReviewType::CompletionVerification => "Completion Verification",
            ReviewType::DelayReport => "Delay Report",
            ReviewType::FraudAlert => "Fraud Alert",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderDocuments {
    #[serde(default)]
    pub prepared_date: Option<String>,
    #[serde(default)]
    pub approved_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderInfo {
    #[serde(default)]
    pub invitation_date: Option<String>,
    #[serde(default)]
    pub open_date: Option<String>,
    #[serde(default)]
    pub evaluation_completion_date: Option<String>,
    #[serde(default)]
    pub proposal_consent_received: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementPlan {
    pub sl_no: u32,
    pub project_type: String,
    pub details_of_work: String,
    #[serde(default)]
    pub date_of_approval: Option<String>,
    pub procurement_method: ProcurementMethod,
    #[serde(default)]
    pub no_of_package: u32,
    #[serde(default)]
    pub type_of_contract: Option<String>,
    #[serde(default)]
    pub tender_documents: Option<TenderDocuments>,
    #[serde(default)]
    pub date_of_agreement: Option<String>,
    #[serde(default)]
    pub tender: Option<TenderInfo>,
    #[serde(default)]
    pub date_of_approval_tender: Option<String>,
    #[serde(default)]
    pub date_of_signing_contract: Option<String>,
    #[serde(default)]
    pub date_of_initiation: Option<String>,
    #[serde(default)]
    pub date_of_completion: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub contract_number: Option<String>,
    #[serde(default)]
    pub contract_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signatures {
    #[serde(default)]
    pub preparing_officer: Option<Signature>,
    #[serde(default)]
    pub chief_of_office: Option<Signature>,
    #[serde(default)]
    pub department_head: Option<Signature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub lat: f64,
    pub lng: f64,
}

/// A citizen report as returned by either the legacy report endpoint or the
/// review endpoints. `work_completed` and `verified` are decoded leniently so
/// they are always real booleans regardless of how the server encoded them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenReport {
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default)]
    pub reporter_contact: Option<String>,
    #[serde(default)]
    pub review_type: Option<ReviewType>,
    #[serde(alias = "report_text", default)]
    pub review_text: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub work_completed: bool,
    #[serde(default)]
    pub quality_rating: Option<u8>,
    #[serde(default)]
    pub geolocation: Option<Geolocation>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photo_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub verified: bool,
    #[serde(default)]
    pub timestamp: String,
}

impl CitizenReport {
    /// All photos attached to the report, including the legacy single
    /// `photo_url` when the list form is empty.
    pub fn photos(&self) -> Vec<&str> {
        if self.photo_urls.is_empty() {
            self.photo_url.iter().map(String::as_str).collect()
        } else {
            self.photo_urls.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub fiscal_year: String,
    pub ministry: String,
    pub budget_subtitle: String,
    pub procurement_plan: ProcurementPlan,
    #[serde(default)]
    pub signatures: Option<Signatures>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citizen_reports: Vec<CitizenReport>,
    #[serde(default)]
    pub citizen_reports_count: Option<usize>,
}

impl Project {
    pub fn contract_amount(&self) -> Option<f64> {
        self.procurement_plan.contract_amount
    }

    /// Report count as advertised by the server, falling back to the loaded
    /// reports when the count field is absent.
    pub fn reports_count(&self) -> usize {
        self.citizen_reports_count
            .unwrap_or(self.citizen_reports.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_projects: usize,
    pub total_contract_value: f64,
    pub average_progress: f64,
    #[serde(default)]
    pub status_breakdown: BTreeMap<ProjectStatus, usize>,
    #[serde(default)]
    pub total_citizen_reports: usize,
    #[serde(default)]
    pub ministries_count: usize,
    #[serde(default)]
    pub fiscal_years: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub ministries: Vec<String>,
    #[serde(default)]
    pub fiscal_years: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<ProjectStatus>,
    #[serde(default)]
    pub procurement_methods: Vec<ProcurementMethod>,
}

/// Sparse project query. A `None` field, or a string field that is empty
/// after trimming, places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub ministry: Option<String>,
    pub status: Option<ProjectStatus>,
    pub fiscal_year: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ministry(mut self, ministry: impl Into<String>) -> Self {
        self.ministry = Some(ministry.into());
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn fiscal_year(mut self, fiscal_year: impl Into<String>) -> Self {
        self.fiscal_year = Some(fiscal_year.into());
        self
    }

    pub fn amount_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn ministry_value(&self) -> Option<&str> {
        non_empty(self.ministry.as_deref())
    }

    pub fn fiscal_year_value(&self) -> Option<&str> {
        non_empty(self.fiscal_year.as_deref())
    }

    pub fn search_value(&self) -> Option<&str> {
        non_empty(self.search.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.ministry_value().is_none()
            && self.status.is_none()
            && self.fiscal_year_value().is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && self.search_value().is_none()
    }

    /// Query parameters for `GET /api/projects/`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ministry) = self.ministry_value() {
            query.push(("ministry".to_string(), ministry.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(fiscal_year) = self.fiscal_year_value() {
            query.push(("fiscal_year".to_string(), fiscal_year.to_string()));
        }
        if let Some(min) = self.min_amount {
            query.push(("min_amount".to_string(), min.to_string()));
        }
        if let Some(max) = self.max_amount {
            query.push(("max_amount".to_string(), max.to_string()));
        }
        if let Some(search) = self.search_value() {
            query.push(("search".to_string(), search.to_string()));
        }
        query
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressTimeline {
    #[serde(default)]
    pub contract_signed: Option<String>,
    #[serde(default)]
    pub work_initiated: Option<String>,
    #[serde(default)]
    pub expected_completion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub project_id: String,
    pub project_name: String,
    pub status: ProjectStatus,
    pub progress_percentage: u8,
    #[serde(default)]
    pub timeline: ProgressTimeline,
    #[serde(default)]
    pub contractor: Option<String>,
    #[serde(default)]
    pub contract_amount: Option<f64>,
    #[serde(default)]
    pub citizen_reports_count: usize,
}

impl From<&Project> for ProjectProgress {
    fn from(project: &Project) -> Self {
        let plan = &project.procurement_plan;
        Self {
            project_id: project.id.clone(),
            project_name: plan.details_of_work.clone(),
            status: project.status,
            progress_percentage: project.progress_percentage,
            timeline: ProgressTimeline {
                contract_signed: plan.date_of_signing_contract.clone(),
                work_initiated: plan.date_of_initiation.clone(),
                expected_completion: plan.date_of_completion.clone(),
            },
            contractor: plan.contractor_name.clone(),
            contract_amount: plan.contract_amount,
            citizen_reports_count: project.citizen_reports.len(),
        }
    }
}

/// Body of the legacy `POST /api/projects/{id}/report` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCitizenReport {
    pub project_id: String,
    pub reporter_name: Option<String>,
    pub report_text: String,
    pub photo_url: Option<String>,
    pub geolocation: Option<Geolocation>,
    pub timestamp: String,
    pub verified: bool,
}

impl NewCitizenReport {
    pub fn new(project_id: impl Into<String>, report_text: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            reporter_name: None,
            report_text: report_text.into(),
            photo_url: None,
            geolocation: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            verified: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSubmission {
    pub message: String,
    pub report: CitizenReport,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_bool(&value))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Interprets an arbitrary JSON value as a boolean.
pub fn coerce_bool(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}
