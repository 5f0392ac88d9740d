//! Domain registry: every record family the student owns, described as data.
//!
//! Layout:
//! - field tables (`DomainSpec` / `FieldSpec`) drive payload validation,
//!   the generated SQL in `db::sqlite`, and the snapshot assembly
//! - `validate.rs`: payload checking against a field table

pub mod validate;

/// Scalar kind a field accepts in JSON payloads and its column affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// TEXT column, JSON string.
    Text,
    /// REAL column, JSON number.
    Number,
    /// INTEGER column, JSON integer.
    Integer,
    /// INTEGER 0/1 column, JSON boolean.
    Bool,
    /// TEXT column, JSON `YYYY-MM-DD` string.
    Date,
}

/// One client-writable field of a domain record. Server-owned columns
/// (`id`, `student_id`, timestamps) are never listed here, which is what
/// keeps them server-assigned: a payload naming them fails as unknown.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in JSON payloads and responses.
    pub json: &'static str,
    /// Column in the backing table.
    pub column: &'static str,
    pub kind: FieldKind,
    /// Must be present on create; must not be null on update.
    pub required: bool,
    /// Allowed values for closed-enum text fields; empty = unconstrained.
    pub one_of: &'static [&'static str],
}

const fn req(json: &'static str, column: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        json,
        column,
        kind,
        required: true,
        one_of: &[],
    }
}

const fn opt(json: &'static str, column: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        json,
        column,
        kind,
        required: false,
        one_of: &[],
    }
}

const fn req_enum(
    json: &'static str,
    column: &'static str,
    one_of: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        json,
        column,
        kind: FieldKind::Text,
        required: true,
        one_of,
    }
}

/// One list-valued domain owned by the student.
#[derive(Debug, Clone, Copy)]
pub struct DomainSpec {
    /// URL segment under `/api/`.
    pub route: &'static str,
    /// Backing table.
    pub table: &'static str,
    /// Key of this collection in the snapshot object.
    pub snapshot_key: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Per-student singleton (upserted, never multiplied).
#[derive(Debug, Clone, Copy)]
pub struct SingletonSpec {
    pub table: &'static str,
    pub snapshot_key: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const CLASS_STATUSES: &[&str] = &["completed", "in_progress", "remaining", "failed"];
pub const GYM_SESSION_TYPES: &[&str] = &["gym", "walk", "workout"];

use FieldKind::{Bool, Date, Integer, Number, Text};

/// All list-valued domains, in snapshot order.
pub const DOMAINS: &[DomainSpec] = &[
    DomainSpec {
        route: "classes",
        table: "classes",
        snapshot_key: "classes",
        fields: &[
            req("name", "name", Text),
            req_enum("status", "status", CLASS_STATUSES),
            req("credits", "credits", Number),
            opt("grade", "grade", Number),
            opt("semester", "semester", Text),
            opt("instructor", "instructor", Text),
        ],
    },
    DomainSpec {
        route: "exams",
        table: "exams",
        snapshot_key: "exams",
        fields: &[
            req("title", "title", Text),
            opt("classId", "class_id", Text),
            req("date", "date", Date),
            opt("grade", "grade", Number),
            opt("weight", "weight", Number),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "grading-categories",
        table: "grading_categories",
        snapshot_key: "gradingCategories",
        fields: &[
            opt("classId", "class_id", Text),
            req("name", "name", Text),
            req("weight", "weight", Number),
        ],
    },
    DomainSpec {
        route: "study-sessions",
        table: "study_sessions",
        snapshot_key: "studySessions",
        fields: &[
            req("subject", "subject", Text),
            req("date", "date", Date),
            req("durationMinutes", "duration_minutes", Integer),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "gym-sessions",
        table: "gym_sessions",
        snapshot_key: "gymSessions",
        fields: &[
            req_enum("type", "type", GYM_SESSION_TYPES),
            req("date", "date", Date),
            opt("durationMinutes", "duration_minutes", Integer),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "happiness-entries",
        table: "happiness_entries",
        snapshot_key: "happinessEntries",
        fields: &[
            req("date", "date", Date),
            req("rating", "rating", Integer),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "sleep-entries",
        table: "sleep_entries",
        snapshot_key: "sleepEntries",
        fields: &[
            req("date", "date", Date),
            req("hours", "hours", Number),
            opt("quality", "quality", Integer),
        ],
    },
    DomainSpec {
        route: "hydration-entries",
        table: "hydration_entries",
        snapshot_key: "hydrationEntries",
        fields: &[req("date", "date", Date), req("glasses", "glasses", Integer)],
    },
    DomainSpec {
        route: "assignments",
        table: "assignments",
        snapshot_key: "assignments",
        fields: &[
            req("title", "title", Text),
            opt("classId", "class_id", Text),
            req("dueDate", "due_date", Date),
            opt("completed", "completed", Bool),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "class-notes",
        table: "class_notes",
        snapshot_key: "classNotes",
        fields: &[
            opt("classId", "class_id", Text),
            req("title", "title", Text),
            req("content", "content", Text),
        ],
    },
    DomainSpec {
        route: "expenses",
        table: "expenses",
        snapshot_key: "expenses",
        fields: &[
            req("description", "description", Text),
            req("amount", "amount", Number),
            opt("category", "category", Text),
            req("date", "date", Date),
        ],
    },
    DomainSpec {
        route: "income-entries",
        table: "income_entries",
        snapshot_key: "incomeEntries",
        fields: &[
            req("description", "description", Text),
            req("amount", "amount", Number),
            req("date", "date", Date),
        ],
    },
    DomainSpec {
        route: "credit-cards",
        table: "credit_cards",
        snapshot_key: "creditCards",
        fields: &[
            req("name", "name", Text),
            req("balance", "balance", Number),
            opt("creditLimit", "credit_limit", Number),
            opt("dueDay", "due_day", Integer),
        ],
    },
    DomainSpec {
        route: "emergency-fund-contributions",
        table: "emergency_fund_contributions",
        snapshot_key: "emergencyFundContributions",
        fields: &[
            req("amount", "amount", Number),
            req("date", "date", Date),
            opt("notes", "notes", Text),
        ],
    },
    DomainSpec {
        route: "semesters",
        table: "semesters",
        snapshot_key: "semesters",
        fields: &[
            req("name", "name", Text),
            opt("startDate", "start_date", Date),
            opt("endDate", "end_date", Date),
            opt("isActive", "is_active", Bool),
        ],
    },
    DomainSpec {
        route: "semester-archives",
        table: "semester_archives",
        snapshot_key: "semesterArchives",
        fields: &[
            req("name", "name", Text),
            opt("gpa", "gpa", Number),
            opt("creditsEarned", "credits_earned", Number),
        ],
    },
    DomainSpec {
        route: "daily-tracking",
        table: "daily_tracking",
        snapshot_key: "dailyTracking",
        fields: &[
            req("date", "date", Date),
            opt("gymCompleted", "gym_completed", Bool),
            opt("studyCompleted", "study_completed", Bool),
            opt("sleepCompleted", "sleep_completed", Bool),
            opt("hydrationCompleted", "hydration_completed", Bool),
            opt("budgetRespected", "budget_respected", Bool),
        ],
    },
];

/// Goal configuration, one row per student. Column DEFAULTs in
/// `db::schema` hold the same values as `service::snapshot`'s synthesized
/// defaults.
pub const SETTINGS: SingletonSpec = SingletonSpec {
    table: "settings",
    snapshot_key: "settings",
    fields: &[
        req("weeklyGymGoal", "weekly_gym_goal", Integer),
        req("weeklyStudyGoal", "weekly_study_goal", Integer),
        req("sleepGoalHours", "sleep_goal_hours", Number),
        req("hydrationGoalGlasses", "hydration_goal_glasses", Integer),
        req("monthlyBudget", "monthly_budget", Number),
        req("totalDegreeCredits", "total_degree_credits", Number),
        req("theme", "theme", Text),
    ],
};

pub const EMERGENCY_FUND: SingletonSpec = SingletonSpec {
    table: "emergency_fund",
    snapshot_key: "emergencyFund",
    fields: &[req("goalAmount", "goal_amount", Number)],
};

/// Look a domain up by its URL segment. Unknown segments are a 404 at the
/// routing layer, not a validation error.
pub fn domain_for_route(route: &str) -> Option<&'static DomainSpec> {
    DOMAINS.iter().find(|d| d.route == route)
}
