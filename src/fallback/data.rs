use crate::models::{
    CitizenReport, Geolocation, Location, ProcurementMethod, ProcurementPlan, Project,
    ProjectStatus, ReviewType, Signature, Signatures, TenderDocuments, TenderInfo,
};

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn signed(designation: &str, date: &str) -> Option<Signature> {
    Some(Signature {
        signature: s("signed"),
        designation: s(designation),
        date: s(date),
    })
}

struct Report<'a> {
    id: &'a str,
    reporter: &'a str,
    review_type: ReviewType,
    text: &'a str,
    work_completed: bool,
    rating: Option<u8>,
    photo: Option<&'a str>,
    at: (f64, f64),
    timestamp: &'a str,
    verified: bool,
}

impl From<Report<'_>> for CitizenReport {
    fn from(r: Report<'_>) -> Self {
        CitizenReport {
            review_id: s(r.id),
            reporter_name: s(r.reporter),
            reporter_contact: None,
            review_type: Some(r.review_type),
            review_text: r.text.to_string(),
            work_completed: r.work_completed,
            quality_rating: r.rating,
            geolocation: Some(Geolocation {
                lat: r.at.0,
                lng: r.at.1,
            }),
            photo_urls: r.photo.map(|p| vec![p.to_string()]).unwrap_or_default(),
            photo_url: None,
            verified: r.verified,
            timestamp: r.timestamp.to_string(),
        }
    }
}

fn with_count(mut project: Project) -> Project {
    project.citizen_reports_count = Some(project.citizen_reports.len());
    project
}

pub(super) fn sample_projects() -> Vec<Project> {
    vec![
        with_count(Project {
            id: "PRJ-2087-001".to_string(),
            fiscal_year: "2086/87".to_string(),
            ministry: "Likhu Tamakoshi Rural Municipality".to_string(),
            budget_subtitle: "2082/83-21-05".to_string(),
            procurement_plan: ProcurementPlan {
                sl_no: 1,
                project_type: "Estimated".to_string(),
                details_of_work: "Hile Khanapani Yojana-6, Khamti".to_string(),
                date_of_approval: s("10-10-2025"),
                procurement_method: ProcurementMethod::WorksNcb,
                no_of_package: 0,
                type_of_contract: s("Lump Sum"),
                tender_documents: Some(TenderDocuments {
                    prepared_date: s("13-10-2025"),
                    approved_date: s("13-10-2025"),
                }),
                date_of_agreement: None,
                tender: Some(TenderInfo {
                    invitation_date: s("16-10-2025"),
                    open_date: s("16-11-2025"),
                    evaluation_completion_date: s("21-11-2025"),
                    proposal_consent_received: None,
                }),
                date_of_approval_tender: s("28-11-2025"),
                date_of_signing_contract: s("01-12-2025"),
                date_of_initiation: s("02-12-2025"),
                date_of_completion: s("01-03-2026"),
                contractor_name: s("Himalayan Construction Pvt. Ltd."),
                contract_number: s("LTM/2087/WTR-001"),
                contract_amount: Some(5_500_000.0),
            },
            signatures: Some(Signatures {
                preparing_officer: signed("Procurement Officer", "10-10-2025"),
                chief_of_office: signed("Chief Administrative Officer", "11-10-2025"),
                department_head: signed("Rural Municipality Chairman", "12-10-2025"),
            }),
            status: ProjectStatus::InProgress,
            progress_percentage: 35,
            location: Some(Location {
                lat: 27.6915,
                lng: 86.0660,
                address: s("Hile Khanapani, Ward 6, Khamti"),
            }),
            citizen_reports: vec![
                Report {
                    id: "REV-0001A001",
                    reporter: "Ram Bahadur",
                    review_type: ReviewType::ProgressUpdate,
                    text: "Construction has started but equipment seems insufficient",
                    work_completed: false,
                    rating: Some(3),
                    photo: Some("https://example.com/photos/construction1.jpg"),
                    at: (27.6915, 86.0660),
                    timestamp: "2025-12-15T10:30:00",
                    verified: false,
                }
                .into(),
            ],
            citizen_reports_count: None,
        }),
        with_count(Project {
            id: "PRJ-2087-002".to_string(),
            fiscal_year: "2086/87".to_string(),
            ministry: "Ministry of Health".to_string(),
            budget_subtitle: "2085/86-14-03".to_string(),
            procurement_plan: ProcurementPlan {
                sl_no: 2,
                project_type: "Estimated".to_string(),
                details_of_work: "Construction of Primary Health Center - Bhaktapur District"
                    .to_string(),
                date_of_approval: s("15-08-2025"),
                procurement_method: ProcurementMethod::WorksNcb,
                no_of_package: 1,
                type_of_contract: s("Turnkey"),
                tender_documents: Some(TenderDocuments {
                    prepared_date: s("20-08-2025"),
                    approved_date: s("22-08-2025"),
                }),
                date_of_agreement: s("25-08-2025"),
                tender: Some(TenderInfo {
                    invitation_date: s("01-09-2025"),
                    open_date: s("01-10-2025"),
                    evaluation_completion_date: s("10-10-2025"),
                    proposal_consent_received: s("12-10-2025"),
                }),
                date_of_approval_tender: s("15-10-2025"),
                date_of_signing_contract: s("20-10-2025"),
                date_of_initiation: s("25-10-2025"),
                date_of_completion: s("25-04-2026"),
                contractor_name: s("Nepal Infrastructure Ltd."),
                contract_number: s("MOH/2087/HLTH-002"),
                contract_amount: Some(18_500_000.0),
            },
            signatures: Some(Signatures {
                preparing_officer: signed("Senior Procurement Officer", "15-08-2025"),
                chief_of_office: signed("Director General", "16-08-2025"),
                department_head: signed("Secretary, Ministry of Health", "17-08-2025"),
            }),
            status: ProjectStatus::InProgress,
            progress_percentage: 60,
            location: Some(Location {
                lat: 27.6710,
                lng: 85.4298,
                address: s("Bhaktapur Municipality, Ward 10"),
            }),
            citizen_reports: vec![
                Report {
                    id: "REV-0002B001",
                    reporter: "Sita Sharma",
                    review_type: ReviewType::ProgressUpdate,
                    text: "Good progress, foundation complete and walls are being built",
                    work_completed: false,
                    rating: Some(4),
                    photo: Some("https://example.com/photos/health_center1.jpg"),
                    at: (27.6710, 85.4298),
                    timestamp: "2025-11-10T14:20:00",
                    verified: true,
                }
                .into(),
            ],
            citizen_reports_count: None,
        }),
        with_count(Project {
            id: "PRJ-2087-003".to_string(),
            fiscal_year: "2086/87".to_string(),
            ministry: "Ministry of Education".to_string(),
            budget_subtitle: "2086/87-32-08".to_string(),
            procurement_plan: ProcurementPlan {
                sl_no: 3,
                project_type: "Estimated".to_string(),
                details_of_work: "School Building Construction - 10 Classrooms, Chitwan"
                    .to_string(),
                date_of_approval: s("05-07-2025"),
                procurement_method: ProcurementMethod::WorksNcb,
                no_of_package: 1,
                type_of_contract: s("Fixed Price"),
                tender_documents: Some(TenderDocuments {
                    prepared_date: s("10-07-2025"),
                    approved_date: s("12-07-2025"),
                }),
                date_of_agreement: s("15-07-2025"),
                tender: Some(TenderInfo {
                    invitation_date: s("20-07-2025"),
                    open_date: s("20-08-2025"),
                    evaluation_completion_date: s("28-08-2025"),
                    proposal_consent_received: s("30-08-2025"),
                }),
                date_of_approval_tender: s("05-09-2025"),
                date_of_signing_contract: s("10-09-2025"),
                date_of_initiation: s("15-09-2025"),
                date_of_completion: s("15-03-2026"),
                contractor_name: s("Everest Builders Pvt. Ltd."),
                contract_number: s("MOE/2087/EDU-003"),
                contract_amount: Some(12_000_000.0),
            },
            signatures: Some(Signatures {
                preparing_officer: signed("Procurement Specialist", "05-07-2025"),
                chief_of_office: signed("Director", "06-07-2025"),
                department_head: signed("Secretary, Ministry of Education", "07-07-2025"),
            }),
            status: ProjectStatus::Completed,
            progress_percentage: 100,
            location: Some(Location {
                lat: 27.5291,
                lng: 84.3542,
                address: s("Bharatpur Metropolitan City, Ward 15, Chitwan"),
            }),
            citizen_reports: vec![
                Report {
                    id: "REV-0003C001",
                    reporter: "Krishna Thapa",
                    review_type: ReviewType::CompletionVerification,
                    text: "Building completed and students have started using classrooms!",
                    work_completed: true,
                    rating: Some(5),
                    photo: Some("https://example.com/photos/school_complete.jpg"),
                    at: (27.5291, 84.3542),
                    timestamp: "2025-11-18T09:15:00",
                    verified: true,
                }
                .into(),
            ],
            citizen_reports_count: None,
        }),
        with_count(Project {
            id: "PRJ-2087-004".to_string(),
            fiscal_year: "2086/87".to_string(),
            ministry: "Ministry of Physical Infrastructure".to_string(),
            budget_subtitle: "2086/87-45-12".to_string(),
            procurement_plan: ProcurementPlan {
                sl_no: 4,
                project_type: "Estimated".to_string(),
                details_of_work:
                    "Road Widening and Blacktopping - Pokhara to Baglung Highway (25km)"
                        .to_string(),
                date_of_approval: s("01-06-2025"),
                procurement_method: ProcurementMethod::WorksIcb,
                no_of_package: 2,
                type_of_contract: s("Unit Price"),
                tender_documents: Some(TenderDocuments {
                    prepared_date: s("10-06-2025"),
                    approved_date: s("15-06-2025"),
                }),
                date_of_agreement: s("20-06-2025"),
                tender: Some(TenderInfo {
                    invitation_date: s("01-07-2025"),
                    open_date: s("01-08-2025"),
                    evaluation_completion_date: s("15-08-2025"),
                    proposal_consent_received: s("20-08-2025"),
                }),
                date_of_approval_tender: s("25-08-2025"),
                date_of_signing_contract: s("01-09-2025"),
                date_of_initiation: s("10-09-2025"),
                date_of_completion: s("10-06-2026"),
                contractor_name: s("China Road & Bridge Corporation"),
                contract_number: s("MOPI/2087/RD-004"),
                contract_amount: Some(450_000_000.0),
            },
            signatures: Some(Signatures {
                preparing_officer: signed("Senior Engineer", "01-06-2025"),
                chief_of_office: signed("Director General, Department of Roads", "02-06-2025"),
                department_head: signed(
                    "Secretary, Ministry of Physical Infrastructure",
                    "03-06-2025",
                ),
            }),
            status: ProjectStatus::Delayed,
            progress_percentage: 20,
            location: Some(Location {
                lat: 28.2096,
                lng: 83.9856,
                address: s("Pokhara-Baglung Highway, Kaski-Parbat"),
            }),
            citizen_reports: vec![
                Report {
                    id: "REV-0004D001",
                    reporter: "Anonymous",
                    review_type: ReviewType::DelayReport,
                    text: "Work has stopped for 2 weeks. No workers on site. Only 5km completed so far.",
                    work_completed: false,
                    rating: Some(2),
                    photo: Some("https://example.com/photos/road_delayed.jpg"),
                    at: (28.2096, 83.9856),
                    timestamp: "2025-11-17T16:45:00",
                    verified: false,
                }
                .into(),
                Report {
                    id: "REV-0004D002",
                    reporter: "Local Transport Association",
                    review_type: ReviewType::QualityIssue,
                    text: "Contractor not following quality standards. Need inspection.",
                    work_completed: false,
                    rating: Some(1),
                    photo: None,
                    at: (28.2100, 83.9850),
                    timestamp: "2025-11-16T11:30:00",
                    verified: false,
                }
                .into(),
            ],
            citizen_reports_count: None,
        }),
    ]
}
