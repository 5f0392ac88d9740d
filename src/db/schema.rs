//! SQL DDL for initializing the student-data store.
//! SQLite-first design; executed statement-by-statement at startup.

/// SQLite schema. Conventions:
/// - `id` TEXT PRIMARY KEY holding a server-generated UUID v4
/// - `student_id` TEXT owner column on every domain table, indexed
/// - `created_at` / `updated_at` TEXT in RFC3339 UTC (second precision,
///   so lexicographic order is chronological)
/// - booleans stored as INTEGER 0/1
///
/// `students.slot` is the singleton guard: the constant-1 UNIQUE column makes
/// a second student row impossible at the store level. `sessions.user_id`
/// deliberately carries no FOREIGN KEY so a dangling session resolves to
/// Unauthenticated instead of being unrepresentable.
///
/// The DEFAULT clauses on `settings` and `emergency_fund` are the documented
/// singleton defaults; `service::snapshot` mirrors them for students that
/// have not persisted a row yet.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id TEXT PRIMARY KEY,
    slot INTEGER NOT NULL DEFAULT 1 UNIQUE CHECK (slot = 1),
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL CHECK (role IN ('student', 'parent')),
    student_id TEXT NOT NULL REFERENCES students(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);

CREATE TABLE IF NOT EXISTS classes (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    name TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('completed', 'in_progress', 'remaining', 'failed')),
    credits REAL NOT NULL,
    grade REAL,
    semester TEXT,
    instructor TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_classes_student ON classes(student_id);

CREATE TABLE IF NOT EXISTS exams (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    title TEXT NOT NULL,
    class_id TEXT,
    date TEXT NOT NULL,
    grade REAL,
    weight REAL,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exams_student ON exams(student_id);

CREATE TABLE IF NOT EXISTS grading_categories (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    class_id TEXT,
    name TEXT NOT NULL,
    weight REAL NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_grading_categories_student ON grading_categories(student_id);

CREATE TABLE IF NOT EXISTS study_sessions (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    subject TEXT NOT NULL,
    date TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_study_sessions_student ON study_sessions(student_id);

CREATE TABLE IF NOT EXISTS gym_sessions (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    type TEXT NOT NULL CHECK (type IN ('gym', 'walk', 'workout')),
    date TEXT NOT NULL,
    duration_minutes INTEGER,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_gym_sessions_student ON gym_sessions(student_id);

CREATE TABLE IF NOT EXISTS happiness_entries (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    date TEXT NOT NULL,
    rating INTEGER NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_happiness_entries_student ON happiness_entries(student_id);

CREATE TABLE IF NOT EXISTS sleep_entries (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    date TEXT NOT NULL,
    hours REAL NOT NULL,
    quality INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sleep_entries_student ON sleep_entries(student_id);

CREATE TABLE IF NOT EXISTS hydration_entries (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    date TEXT NOT NULL,
    glasses INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_hydration_entries_student ON hydration_entries(student_id);

CREATE TABLE IF NOT EXISTS assignments (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    title TEXT NOT NULL,
    class_id TEXT,
    due_date TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_assignments_student ON assignments(student_id);

CREATE TABLE IF NOT EXISTS class_notes (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    class_id TEXT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_class_notes_student ON class_notes(student_id);

CREATE TABLE IF NOT EXISTS expenses (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_student ON expenses(student_id);

CREATE TABLE IF NOT EXISTS income_entries (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_income_entries_student ON income_entries(student_id);

CREATE TABLE IF NOT EXISTS credit_cards (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    name TEXT NOT NULL,
    balance REAL NOT NULL,
    credit_limit REAL,
    due_day INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_credit_cards_student ON credit_cards(student_id);

CREATE TABLE IF NOT EXISTS emergency_fund (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL UNIQUE REFERENCES students(id),
    goal_amount REAL NOT NULL DEFAULT 1000.0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS emergency_fund_contributions (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    amount REAL NOT NULL,
    date TEXT NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_emergency_fund_contributions_student ON emergency_fund_contributions(student_id);

CREATE TABLE IF NOT EXISTS semesters (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    name TEXT NOT NULL,
    start_date TEXT,
    end_date TEXT,
    is_active INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_semesters_student ON semesters(student_id);

CREATE TABLE IF NOT EXISTS semester_archives (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    name TEXT NOT NULL,
    gpa REAL,
    credits_earned REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_semester_archives_student ON semester_archives(student_id);

CREATE TABLE IF NOT EXISTS daily_tracking (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL REFERENCES students(id),
    date TEXT NOT NULL,
    gym_completed INTEGER NOT NULL DEFAULT 0,
    study_completed INTEGER NOT NULL DEFAULT 0,
    sleep_completed INTEGER NOT NULL DEFAULT 0,
    hydration_completed INTEGER NOT NULL DEFAULT 0,
    budget_respected INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_daily_tracking_student ON daily_tracking(student_id);

CREATE TABLE IF NOT EXISTS settings (
    id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL UNIQUE REFERENCES students(id),
    weekly_gym_goal INTEGER NOT NULL DEFAULT 3,
    weekly_study_goal INTEGER NOT NULL DEFAULT 5,
    sleep_goal_hours REAL NOT NULL DEFAULT 8.0,
    hydration_goal_glasses INTEGER NOT NULL DEFAULT 8,
    monthly_budget REAL NOT NULL DEFAULT 1000.0,
    total_degree_credits REAL NOT NULL DEFAULT 120.0,
    theme TEXT NOT NULL DEFAULT 'system',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
