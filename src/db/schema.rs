pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS areas (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   TEXT NOT NULL,
    name      TEXT NOT NULL,
    color     TEXT NOT NULL DEFAULT '',
    priority  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS area_keywords (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    area_id  INTEGER NOT NULL REFERENCES areas(id) ON DELETE CASCADE,
    keyword  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    date         TEXT NOT NULL,
    description  TEXT NOT NULL,
    amount       TEXT NOT NULL,
    category     TEXT NOT NULL DEFAULT 'Everyday'
);

CREATE TABLE IF NOT EXISTS fixed_costs (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id            TEXT NOT NULL,
    name               TEXT NOT NULL,
    amount             TEXT NOT NULL,
    year_month         INTEGER NOT NULL,
    recurrence         TEXT NOT NULL DEFAULT 'once',
    recurrence_months  TEXT,
    paid_months        TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS incomes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     TEXT NOT NULL,
    name        TEXT NOT NULL,
    amount      TEXT NOT NULL,
    year_month  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_areas_user ON areas(user_id);
CREATE INDEX IF NOT EXISTS idx_area_keywords_area ON area_keywords(area_id);
CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);
CREATE INDEX IF NOT EXISTS idx_fixed_costs_user_month ON fixed_costs(user_id, year_month);
CREATE INDEX IF NOT EXISTS idx_incomes_user_month ON incomes(user_id, year_month);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;
